use crate::protocol::envelope::Envelope;
use crate::protocol::request::StopRequest;
use crate::protocol::{checksum, klv};
use crate::repositories::CardRepository;
use authex_primitives::codes::{ResultCode, TransactionType, TxOperation};
use authex_primitives::models::{AppState, NewWalletTransaction};
use authex_primitives::GatewayError;
use rust_decimal::Decimal;
use tracing::{info, warn};

pub struct StopService;

impl StopService {
    /// Stop: the processor asks for the card to be blocked. The card is
    /// located by the last four digits of the voucher number; stopping an
    /// already-stopped card is acknowledged without a new ledger row.
    pub fn stop(state: &AppState, envelope: &Envelope) -> Result<ResultCode, GatewayError> {
        let req = StopRequest::from_envelope(envelope)?;

        // the payload is decoded before the checksum comparison; a
        // malformed tx-data is refused as do-not-honor even when the
        // checksum is also wrong
        let tx_data = klv::decode(&req.tx_data_raw, &state.klv)?;

        if !checksum::verify(
            state.config.terminal.password_bytes(),
            &req.canonical(),
            &req.checksum,
        )? {
            warn!(method = %req.method_name, tx_id = %req.tx_id, "authentication fail");
            return Ok(ResultCode::AuthenticationFail);
        }

        let Some(last4_at) = req.voucher_number.len().checked_sub(4) else {
            info!(
                wallet_id = %req.reference,
                tx_id = %req.tx_id,
                "voucher number too short to locate a card"
            );
            return Ok(ResultCode::DoNotHonor);
        };
        let Some(last4) = req.voucher_number.get(last4_at..) else {
            info!(
                wallet_id = %req.reference,
                tx_id = %req.tx_id,
                "voucher number too short to locate a card"
            );
            return Ok(ResultCode::DoNotHonor);
        };

        let mut read = state
            .db_read
            .get()
            .map_err(|e| GatewayError::DatabaseConnection(e.to_string()))?;
        let card = CardRepository::find_by_wallet_and_last4(&mut read, &req.reference, last4)?;
        let Some(card) = card else {
            info!(wallet_id = %req.reference, last4 = %last4, "card does not exist");
            return Ok(ResultCode::DoNotHonor);
        };

        if card.is_stopped() {
            info!(card_id = %card.card_id, "card is already stopped");
            return Ok(ResultCode::Approved);
        }

        let archived = req.archival_record(&tx_data)?;
        let row = NewWalletTransaction::new(
            &req.reference,
            TransactionType::CardStop,
            TxOperation::Info,
            Decimal::ZERO,
            format!(
                "{} | CARD HAS BEEN STOPPED REASON_CODE={}",
                ResultCode::Approved.description(),
                req.stop_reason
            ),
            archived,
            Some(&req.tx_id),
        );

        let mut write = state
            .db_write
            .get()
            .map_err(|e| GatewayError::DatabaseConnection(e.to_string()))?;
        CardRepository::stop(&mut write, &card.card_id, row)?;

        Ok(ResultCode::Approved)
    }
}
