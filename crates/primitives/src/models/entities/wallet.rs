use crate::codes::STATUS_ACTIVE;
use diesel::Queryable;
use rust_decimal::Decimal;

/// A wallet joined with the statuses of its user and group.
#[derive(Debug, Clone, Queryable)]
pub struct WalletInfo {
    pub wallet_id: String,
    pub status_id: String,
    pub currency_numeric_code: String,
    pub current_balance: Decimal,
    pub available_balance: Decimal,
    pub blocked_balance: Decimal,
    pub user_id: String,
    pub user_status_id: String,
    pub group_id: String,
    pub group_status_id: String,
}

impl WalletInfo {
    pub fn is_active(&self) -> bool {
        self.user_status_id == STATUS_ACTIVE
            && self.status_id == STATUS_ACTIVE
            && self.group_status_id == STATUS_ACTIVE
    }
}
