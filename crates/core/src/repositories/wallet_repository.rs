use authex_primitives::models::{NewWalletTransaction, WalletInfo, WalletTransaction};
use authex_primitives::schema::{users, wallet, wallet_group, wallet_transaction};
use authex_primitives::GatewayError;
use diesel::prelude::*;
use rust_decimal::Decimal;

/// A guarded two-column balance delta applied to one wallet row.
///
/// `expected_available` carries the balance the caller read before entering
/// the transaction; a mismatch against the re-read value aborts, on top of
/// the equality predicates guarding the update itself.
#[derive(Debug, Clone)]
pub struct BalanceMovement<'a> {
    pub wallet_id: &'a str,
    pub expected_available: Option<Decimal>,
    pub delta_available: Decimal,
    pub delta_blocked: Decimal,
}

pub struct WalletRepository;

impl WalletRepository {
    /// Loads a wallet together with the status of its user and group.
    pub fn find_info(
        conn: &mut PgConnection,
        wallet_id: &str,
    ) -> Result<Option<WalletInfo>, GatewayError> {
        wallet::table
            .inner_join(users::table)
            .inner_join(wallet_group::table)
            .filter(wallet::wallet_id.eq(wallet_id))
            .select((
                wallet::wallet_id,
                wallet::status_id,
                wallet::currency_numeric_code,
                wallet::current_balance,
                wallet::available_balance,
                wallet::blocked_balance,
                wallet::user_id,
                users::status_id,
                wallet::group_id,
                wallet_group::status_id,
            ))
            .first::<WalletInfo>(conn)
            .optional()
            .map_err(GatewayError::from)
    }

    /// Locates the antecedent of a reversal or adjustment by the
    /// processor-assigned transaction id of the original request.
    pub fn find_by_external_tx_id(
        conn: &mut PgConnection,
        wallet_id: &str,
        external_tx_id: &str,
    ) -> Result<Option<WalletTransaction>, GatewayError> {
        wallet_transaction::table
            .filter(wallet_transaction::wallet_id.eq(wallet_id))
            .filter(wallet_transaction::external_tx_id.eq(external_tx_id))
            .first::<WalletTransaction>(conn)
            .optional()
            .map_err(GatewayError::from)
    }

    /// Appends one informational ledger row without touching balances.
    pub fn post_transaction(
        conn: &mut PgConnection,
        row: NewWalletTransaction<'_>,
    ) -> Result<(), GatewayError> {
        let inserted = diesel::insert_into(wallet_transaction::table)
            .values(&row)
            .execute(conn)?;
        if inserted != 1 {
            return Err(GatewayError::Ledger(format!(
                "expected one ledger row, inserted {}",
                inserted
            )));
        }
        Ok(())
    }

    /// Applies one balance movement and its ledger row atomically.
    ///
    /// Serializable isolation, a ROW EXCLUSIVE table lock, a `FOR UPDATE`
    /// row lock and an equality-guarded update stack up so that concurrent
    /// movements on the same wallet serialize and a lost update aborts
    /// instead of committing.
    pub fn apply_movement(
        conn: &mut PgConnection,
        movement: &BalanceMovement<'_>,
        row: NewWalletTransaction<'_>,
    ) -> Result<(), GatewayError> {
        conn.build_transaction()
            .serializable()
            .run(|conn| {
                diesel::sql_query("LOCK TABLE wallet IN ROW EXCLUSIVE MODE").execute(conn)?;

                let (available, blocked) = wallet::table
                    .filter(wallet::wallet_id.eq(movement.wallet_id))
                    .select((wallet::available_balance, wallet::blocked_balance))
                    .for_update()
                    .first::<(Decimal, Decimal)>(conn)?;

                if let Some(expected) = movement.expected_available {
                    if available != expected {
                        return Err(GatewayError::Ledger(format!(
                            "available balance of wallet {} moved from {} to {}",
                            movement.wallet_id, expected, available
                        )));
                    }
                }

                let updated = diesel::update(
                    wallet::table
                        .filter(wallet::wallet_id.eq(movement.wallet_id))
                        .filter(wallet::available_balance.eq(available))
                        .filter(wallet::blocked_balance.eq(blocked)),
                )
                .set((
                    wallet::available_balance
                        .eq(wallet::available_balance + movement.delta_available),
                    wallet::blocked_balance.eq(wallet::blocked_balance + movement.delta_blocked),
                ))
                .execute(conn)?;
                if updated != 1 {
                    return Err(GatewayError::Ledger(format!(
                        "wallet {} row changed under the lock, updated {} rows",
                        movement.wallet_id, updated
                    )));
                }

                let inserted = diesel::insert_into(wallet_transaction::table)
                    .values(&row)
                    .execute(conn)?;
                if inserted != 1 {
                    return Err(GatewayError::Ledger(format!(
                        "expected one ledger row, inserted {}",
                        inserted
                    )));
                }

                Ok(())
            })
    }
}
