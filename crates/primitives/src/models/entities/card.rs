use crate::codes::{CARD_STATUS_STOPPED, STATUS_ACTIVE};
use chrono::{DateTime, Utc};
use diesel::Queryable;
use serde_json::Value;

/// A card joined with the status of everything it depends on: its wallet,
/// the wallet group, the owning user and the BIN range.
#[derive(Debug, Clone, Queryable)]
pub struct CardInfo {
    pub card_id: String,
    pub provider_id: String,
    pub provider_card_id: String,
    pub wallet_id: String,
    pub user_id: String,
    pub status_id: String,
    pub bin_number: String,
    pub last_digits: String,
    pub expiration_date: DateTime<Utc>,
    pub valid_date: String,
    pub cardholder_first_name: String,
    pub cardholder_last_name: String,
    pub other_data: Value,
    pub bin_status_id: String,
    pub user_status_id: String,
    pub wallet_group_status_id: String,
    pub wallet_status_id: String,
}

impl CardInfo {
    /// A card can be deducted from only while the whole chain above it is
    /// active and the card has not expired.
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.bin_status_id == STATUS_ACTIVE
            && self.wallet_group_status_id == STATUS_ACTIVE
            && self.wallet_status_id == STATUS_ACTIVE
            && self.user_status_id == STATUS_ACTIVE
            && self.status_id == STATUS_ACTIVE
            && self.expiration_date > now
    }

    pub fn is_stopped(&self) -> bool {
        self.status_id == CARD_STATUS_STOPPED
    }
}
