use crate::protocol::envelope::Envelope;
use crate::protocol::klv::TxData;
use crate::protocol::request::{ReferencedRequest, StandardRequest};
use crate::protocol::{amount, checksum, klv};
use crate::repositories::{BalanceMovement, WalletRepository};
use authex_primitives::codes::{ResultCode, TransactionType, TxOperation};
use authex_primitives::models::{AppState, NewWalletTransaction};
use authex_primitives::GatewayError;
use rust_decimal::Decimal;
use tracing::{error, warn};

pub struct LoadService;

impl LoadService {
    /// LoadAuth: notification that funds are being loaded toward the
    /// cardholder. Informational only; the actual credit arrives with the
    /// LoadAdjustment.
    pub fn auth(state: &AppState, envelope: &Envelope) -> Result<ResultCode, GatewayError> {
        let req = StandardRequest::from_envelope(envelope)?;

        // payload first, checksum second: a malformed tx-data or amount is
        // refused as do-not-honor even when the checksum is also wrong
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

        let archived = req.archival_record(request_amount, &tx_data)?;
        let row = NewWalletTransaction::new(
            &req.reference,
            TransactionType::LoadAuth,
            TxOperation::Info,
            request_amount,
            format!("{} | {}", ResultCode::Approved.description(), req.narrative),
            archived,
            Some(&req.tx_id),
        );
        let mut write = state
            .db_write
            .get()
            .map_err(|e| GatewayError::DatabaseConnection(e.to_string()))?;
        WalletRepository::post_transaction(&mut write, row)?;

        Ok(ResultCode::Approved)
    }

    /// LoadAdjustment: advice confirming the funds of an earlier LoadAuth
    /// have moved. Checksum is verified, but processing failures are still
    /// acknowledged with Approved.
    pub fn adjustment(state: &AppState, envelope: &Envelope) -> Result<ResultCode, GatewayError> {
        let req = ReferencedRequest::from_envelope(envelope)?;

        // a payload that does not decode is acknowledged before the
        // checksum comparison is ever reached
        let (tx_data, request_amount) = match Self::decode_payload(state, &req) {
            Ok(payload) => payload,
            Err(e) => {
                error!(
                    method = %req.method_name,
                    tx_id = %req.tx_id,
                    error = %e,
                    "load adjustment failed, acknowledging for manual reconciliation"
                );
                return Ok(ResultCode::Approved);
            }
        };

        if !checksum::verify(
            state.config.terminal.password_bytes(),
            &req.canonical(),
            &req.checksum,
        )? {
            warn!(method = %req.method_name, tx_id = %req.tx_id, "authentication fail");
            return Ok(ResultCode::AuthenticationFail);
        }

        match Self::apply_movement_row(
            state,
            &req,
            tx_data,
            request_amount,
            TransactionType::LoadAdjustment,
            MovementKind::WithdrawBlocked,
        ) {
            Ok(code) => Ok(code),
            Err(e) => {
                error!(
                    method = %req.method_name,
                    tx_id = %req.tx_id,
                    error = %e,
                    "load adjustment failed, acknowledging for manual reconciliation"
                );
                Ok(ResultCode::Approved)
            }
        }
    }

    /// LoadReversal: advice undoing a LoadAdjustment that was never
    /// acknowledged. Checksum is verified, failures acknowledged.
    pub fn reversal(state: &AppState, envelope: &Envelope) -> Result<ResultCode, GatewayError> {
        let req = ReferencedRequest::from_envelope(envelope)?;

        let (tx_data, request_amount) = match Self::decode_payload(state, &req) {
            Ok(payload) => payload,
            Err(e) => {
                error!(
                    method = %req.method_name,
                    tx_id = %req.tx_id,
                    error = %e,
                    "load reversal failed, acknowledging for manual reconciliation"
                );
                return Ok(ResultCode::Approved);
            }
        };

        if !checksum::verify(
            state.config.terminal.password_bytes(),
            &req.canonical(),
            &req.checksum,
        )? {
            warn!(method = %req.method_name, tx_id = %req.tx_id, "authentication fail");
            return Ok(ResultCode::AuthenticationFail);
        }

        match Self::apply_movement_row(
            state,
            &req,
            tx_data,
            request_amount,
            TransactionType::LoadReversal,
            MovementKind::DepositBlocked,
        ) {
            Ok(code) => Ok(code),
            Err(e) => {
                error!(
                    method = %req.method_name,
                    tx_id = %req.tx_id,
                    error = %e,
                    "load reversal failed, acknowledging for manual reconciliation"
                );
                Ok(ResultCode::Approved)
            }
        }
    }

    /// LoadAuthReversal: advice cancelling a LoadAuth. The original was
    /// informational, so nothing moves; the event is recorded and
    /// acknowledged. No checksum verification, like its advice siblings.
    pub fn auth_reversal(state: &AppState, envelope: &Envelope) -> Result<ResultCode, GatewayError> {
        let req = ReferencedRequest::from_envelope(envelope)?;

        match Self::apply_auth_reversal(state, &req) {
            Ok(code) => Ok(code),
            Err(e) => {
                error!(
                    method = %req.method_name,
                    tx_id = %req.tx_id,
                    error = %e,
                    "load auth reversal failed, acknowledging for manual reconciliation"
                );
                Ok(ResultCode::Approved)
            }
        }
    }

    fn decode_payload(
        state: &AppState,
        req: &ReferencedRequest,
    ) -> Result<(TxData, Decimal), GatewayError> {
        let tx_data = klv::decode(&req.tx_data_raw, &state.klv)?;
        let request_amount = amount::parse_minor_units(&req.amount_raw)?;
        Ok((tx_data, request_amount))
    }

    fn apply_auth_reversal(
        state: &AppState,
        req: &ReferencedRequest,
    ) -> Result<ResultCode, GatewayError> {
        let (tx_data, request_amount) = Self::decode_payload(state, req)?;
        let archived = req.archival_record(request_amount, &tx_data)?;

        let row = NewWalletTransaction::new(
            &req.reference,
            TransactionType::LoadAuthReversal,
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
        WalletRepository::post_transaction(&mut write, row)?;

        Ok(ResultCode::Approved)
    }

    fn apply_movement_row(
        state: &AppState,
        req: &ReferencedRequest,
        tx_data: TxData,
        request_amount: Decimal,
        tx_type: TransactionType,
        kind: MovementKind,
    ) -> Result<ResultCode, GatewayError> {
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
                tx_type = tx_type.as_str(),
                "advice without original transaction"
            );
            return Ok(ResultCode::Approved);
        }

        let archived = req.archival_record(request_amount, &tx_data)?;
        let row = NewWalletTransaction::new(
            &req.reference,
            tx_type,
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

        let delta_blocked = match kind {
            MovementKind::WithdrawBlocked => -request_amount,
            MovementKind::DepositBlocked => request_amount,
        };
        let mut write = state
            .db_write
            .get()
            .map_err(|e| GatewayError::DatabaseConnection(e.to_string()))?;
        WalletRepository::apply_movement(
            &mut write,
            &BalanceMovement {
                wallet_id: &req.reference,
                expected_available: None,
                delta_available: Decimal::ZERO,
                delta_blocked,
            },
            row,
        )?;

        Ok(ResultCode::Approved)
    }
}

/// Direction of a blocked-balance movement for the load advice methods.
#[derive(Debug, Clone, Copy)]
enum MovementKind {
    WithdrawBlocked,
    DepositBlocked,
}
