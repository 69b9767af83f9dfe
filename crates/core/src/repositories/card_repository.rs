use authex_primitives::codes::{CARD_STATUS_STOPPED, PROVIDER_ID};
use authex_primitives::models::{CardInfo, NewWalletTransaction};
use authex_primitives::schema::{card_bin, card_issued, users, wallet, wallet_group};
use authex_primitives::GatewayError;
use diesel::prelude::*;

pub struct CardRepository;

impl CardRepository {
    /// Loads a card by wallet and last four digits, joined with every
    /// status the deduct eligibility check depends on.
    pub fn find_by_wallet_and_last4(
        conn: &mut PgConnection,
        wallet_id: &str,
        last4: &str,
    ) -> Result<Option<CardInfo>, GatewayError> {
        card_issued::table
            .inner_join(
                wallet::table
                    .inner_join(users::table)
                    .inner_join(wallet_group::table),
            )
            .inner_join(card_bin::table)
            .filter(card_issued::provider_id.eq(PROVIDER_ID))
            .filter(card_issued::wallet_id.eq(wallet_id))
            .filter(card_issued::last_digits.eq(last4))
            .select((
                card_issued::card_id,
                card_issued::provider_id,
                card_issued::provider_card_id,
                card_issued::wallet_id,
                wallet::user_id,
                card_issued::status_id,
                card_issued::bin_number,
                card_issued::last_digits,
                card_issued::expiration_date,
                card_issued::valid_date,
                card_issued::cardholder_first_name,
                card_issued::cardholder_last_name,
                card_issued::other_data,
                card_bin::status_id,
                users::status_id,
                wallet_group::status_id,
                wallet::status_id,
            ))
            .first::<CardInfo>(conn)
            .optional()
            .map_err(GatewayError::from)
    }

    /// Stops a card and appends its ledger row in one transaction.
    pub fn stop(
        conn: &mut PgConnection,
        card_id: &str,
        row: NewWalletTransaction<'_>,
    ) -> Result<(), GatewayError> {
        conn.transaction(|conn| {
            let updated = diesel::update(card_issued::table.filter(card_issued::card_id.eq(card_id)))
                .set(card_issued::status_id.eq(CARD_STATUS_STOPPED))
                .execute(conn)?;
            if updated != 1 {
                return Err(GatewayError::Ledger(format!(
                    "card {} stop updated {} rows",
                    card_id, updated
                )));
            }

            let inserted = diesel::insert_into(
                authex_primitives::schema::wallet_transaction::table,
            )
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
