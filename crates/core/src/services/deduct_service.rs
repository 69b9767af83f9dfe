use crate::protocol::envelope::Envelope;
use crate::protocol::request::{ReferencedRequest, StandardRequest};
use crate::protocol::{amount, checksum, klv};
use crate::repositories::{BalanceMovement, CardRepository, WalletRepository};
use authex_primitives::codes::{ResultCode, TransactionType, TxOperation};
use authex_primitives::models::{AppState, NewWalletTransaction};
use authex_primitives::GatewayError;
use chrono::Utc;
use tracing::{error, info, warn};

/// KLV key naming the last four digits of the PAN on a Deduct.
const KLV_LAST_FOUR: &str = "LastfourDigitsPAN";

pub struct DeductService;

impl DeductService {
    /// Deduct: the processor asks to take funds off the store of value for
    /// an ATM, POS or e-commerce transaction. The only method that may
    /// refuse on funds.
    pub fn deduct(state: &AppState, envelope: &Envelope) -> Result<ResultCode, GatewayError> {
        let req = StandardRequest::from_envelope(envelope)?;

        // the payload is decoded before the checksum comparison; a
        // malformed tx-data or amount is refused as do-not-honor even when
        // the checksum is also wrong
        let tx_data = klv::decode(&req.tx_data_raw, &state.klv)?;
        let request_amount = amount::parse_minor_units(&req.amount_raw)?;

        if !checksum::verify(
            state.config.terminal.password_bytes(),
            &req.canonical(),
            &req.checksum,
        )? {
            warn!(method = %req.method_name, tx_id = %req.tx_id, "authentication fail");
            return Ok(ResultCode::AuthenticationFail);
        }

        let last4 = tx_data.get(KLV_LAST_FOUR).unwrap_or("");
        if last4.is_empty() {
            info!(wallet_id = %req.reference, tx_id = %req.tx_id, "deduct without last four digits");
            return Ok(ResultCode::DoNotHonor);
        }

        let mut read = state
            .db_read
            .get()
            .map_err(|e| GatewayError::DatabaseConnection(e.to_string()))?;

        let card = CardRepository::find_by_wallet_and_last4(&mut read, &req.reference, last4)?;
        let usable = card.map(|c| c.is_usable(Utc::now())).unwrap_or(false);
        if !usable {
            info!(wallet_id = %req.reference, last4 = %last4, "card is not usable for deduct");
            return Ok(ResultCode::DoNotHonor);
        }

        let wallet = WalletRepository::find_info(&mut read, &req.reference)?;
        let Some(wallet) = wallet else {
            info!(wallet_id = %req.reference, "wallet does not exist");
            return Ok(ResultCode::DoNotHonor);
        };
        if !wallet.is_active() {
            info!(wallet_id = %req.reference, "wallet is not active");
            return Ok(ResultCode::DoNotHonor);
        }

        let archived = req.archival_record(request_amount, &tx_data)?;
        let mut write = state
            .db_write
            .get()
            .map_err(|e| GatewayError::DatabaseConnection(e.to_string()))?;

        if wallet.available_balance < request_amount {
            let row = NewWalletTransaction::new(
                &req.reference,
                TransactionType::Deduct,
                TxOperation::Info,
                request_amount,
                format!(
                    "{} | {}",
                    ResultCode::NotSufficientFunds.description(),
                    req.narrative
                ),
                archived,
                Some(&req.tx_id),
            );
            WalletRepository::post_transaction(&mut write, row)?;
            return Ok(ResultCode::NotSufficientFunds);
        }

        let row = NewWalletTransaction::new(
            &req.reference,
            TransactionType::Deduct,
            TxOperation::Withdraw,
            request_amount,
            format!("{} | {}", ResultCode::Approved.description(), req.narrative),
            archived,
            Some(&req.tx_id),
        );
        WalletRepository::apply_movement(
            &mut write,
            &BalanceMovement {
                wallet_id: &req.reference,
                expected_available: Some(wallet.available_balance),
                delta_available: -request_amount,
                delta_blocked: request_amount,
            },
            row,
        )?;

        Ok(ResultCode::Approved)
    }

    /// DeductReversal: advice that a Deduct never completed. Accepted
    /// without checksum verification, acknowledged even when processing
    /// fails; the processor retries until it sees Approved.
    pub fn reversal(state: &AppState, envelope: &Envelope) -> Result<ResultCode, GatewayError> {
        let req = ReferencedRequest::from_envelope(envelope)?;

        match Self::apply_reversal(state, &req) {
            Ok(code) => Ok(code),
            Err(e) => {
                error!(
                    method = %req.method_name,
                    tx_id = %req.tx_id,
                    error = %e,
                    "deduct reversal failed, acknowledging for manual reconciliation"
                );
                Ok(ResultCode::Approved)
            }
        }
    }

    fn apply_reversal(
        state: &AppState,
        req: &ReferencedRequest,
    ) -> Result<ResultCode, GatewayError> {
        let tx_data = klv::decode(&req.tx_data_raw, &state.klv)?;
        let request_amount = amount::parse_minor_units(&req.amount_raw)?;

        let mut read = state
            .db_read
            .get()
            .map_err(|e| GatewayError::DatabaseConnection(e.to_string()))?;
        let original =
            WalletRepository::find_by_external_tx_id(&mut read, &req.reference, &req.reference_id)?;
        if original.is_none() {
            warn!(
                wallet_id = %req.reference,
                reference_id = %req.reference_id,
                "deduct reversal without original deduct transaction"
            );
            return Ok(ResultCode::Approved);
        }

        let archived = req.archival_record(request_amount, &tx_data)?;
        let row = NewWalletTransaction::new(
            &req.reference,
            TransactionType::DeductReversal,
            TxOperation::Info,
            request_amount,
            format!(
                "{} | original-tx-id={} | {}",
                ResultCode::Approved.description(),
                req.reference_id,
                req.narrative
            ),
            archived,
            Some(&req.tx_id),
        );

        let mut write = state
            .db_write
            .get()
            .map_err(|e| GatewayError::DatabaseConnection(e.to_string()))?;
        // a reversal undoes the deduct: the blocked portion goes back to
        // the available balance
        WalletRepository::apply_movement(
            &mut write,
            &BalanceMovement {
                wallet_id: &req.reference,
                expected_available: None,
                delta_available: request_amount,
                delta_blocked: -request_amount,
            },
            row,
        )?;

        Ok(ResultCode::Approved)
    }

    /// DeductAdjustment: advice that the debit has already happened on the
    /// processor side. Must post even against insufficient funds; balances
    /// may go negative. Accepted without checksum verification.
    pub fn adjustment(state: &AppState, envelope: &Envelope) -> Result<ResultCode, GatewayError> {
        let req = ReferencedRequest::from_envelope(envelope)?;

        match Self::apply_adjustment(state, &req) {
            Ok(code) => Ok(code),
            Err(e) => {
                error!(
                    method = %req.method_name,
                    tx_id = %req.tx_id,
                    error = %e,
                    "deduct adjustment failed, acknowledging for manual reconciliation"
                );
                Ok(ResultCode::Approved)
            }
        }
    }

    fn apply_adjustment(
        state: &AppState,
        req: &ReferencedRequest,
    ) -> Result<ResultCode, GatewayError> {
        let tx_data = klv::decode(&req.tx_data_raw, &state.klv)?;
        let request_amount = amount::parse_minor_units(&req.amount_raw)?;

        let mut read = state
            .db_read
            .get()
            .map_err(|e| GatewayError::DatabaseConnection(e.to_string()))?;
        let original =
            WalletRepository::find_by_external_tx_id(&mut read, &req.reference, &req.reference_id)?;
        if original.is_none() {
            warn!(
                wallet_id = %req.reference,
                reference_id = %req.reference_id,
                "deduct adjustment without original deduct transaction"
            );
            return Ok(ResultCode::Approved);
        }

        let wallet = WalletRepository::find_info(&mut read, &req.reference)?.ok_or_else(|| {
            GatewayError::NotEligible(format!("wallet {} does not exist", req.reference))
        })?;

        let archived = req.archival_record(request_amount, &tx_data)?;
        let row = NewWalletTransaction::new(
            &req.reference,
            TransactionType::DeductAdjustment,
            TxOperation::Withdraw,
            request_amount,
            format!(
                "{} | original-tx-id={} | {}",
                ResultCode::Approved.description(),
                req.reference_id,
                req.narrative
            ),
            archived,
            Some(&req.tx_id),
        );

        let mut write = state
            .db_write
            .get()
            .map_err(|e| GatewayError::DatabaseConnection(e.to_string()))?;
        WalletRepository::apply_movement(
            &mut write,
            &BalanceMovement {
                wallet_id: &req.reference,
                expected_available: Some(wallet.available_balance),
                delta_available: -request_amount,
                delta_blocked: request_amount,
            },
            row,
        )?;

        Ok(ResultCode::Approved)
    }
}
