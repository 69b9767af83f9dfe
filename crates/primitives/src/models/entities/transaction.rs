use crate::codes::{TransactionType, TxOperation, PROVIDER_ID};
use chrono::{DateTime, Utc};
use diesel::{Insertable, Queryable};
use rust_decimal::Decimal;
use serde_json::Value;
use uuid::Uuid;

/// One row of the append-only wallet ledger. Rows are inserted by the
/// method handlers and never updated or deleted.
#[derive(Debug, Clone, Queryable)]
pub struct WalletTransaction {
    pub transaction_id: Uuid,
    pub wallet_id: String,
    pub group_id: String,
    pub transaction_type_id: String,
    pub transaction_operation: String,
    pub transaction_date: DateTime<Utc>,
    pub transaction_amount: Decimal,
    pub transaction_description: String,
    pub transaction_data: Value,
    pub external_tx_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::wallet_transaction)]
pub struct NewWalletTransaction<'a> {
    pub transaction_id: Uuid,
    pub wallet_id: &'a str,
    pub group_id: &'a str,
    pub transaction_type_id: &'a str,
    pub transaction_operation: &'a str,
    pub transaction_date: DateTime<Utc>,
    pub transaction_amount: Decimal,
    pub transaction_description: String,
    pub transaction_data: Value,
    pub external_tx_id: Option<&'a str>,
}

impl<'a> NewWalletTransaction<'a> {
    pub fn new(
        wallet_id: &'a str,
        tx_type: TransactionType,
        operation: TxOperation,
        amount: Decimal,
        description: String,
        data: Value,
        external_tx_id: Option<&'a str>,
    ) -> Self {
        Self {
            transaction_id: Uuid::new_v4(),
            wallet_id,
            group_id: PROVIDER_ID,
            transaction_type_id: tx_type.as_str(),
            transaction_operation: operation.as_str(),
            transaction_date: Utc::now(),
            transaction_amount: amount,
            transaction_description: description,
            transaction_data: data,
            external_tx_id,
        }
    }
}
