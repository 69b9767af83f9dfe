//! Wire constants of the store-of-value protocol: result codes, transaction
//! types and operations, and the fixed provider identifiers.

pub const SERVICE_NAME: &str = "authex";
pub const APP_NAME: &str = "Payment Methods Authorizer";

/// Provider / wallet-group identifier carried on every ledger row.
pub const PROVIDER_ID: &str = "PMTOL";

pub const STATUS_ACTIVE: &str = "ACTIV";
pub const CARD_STATUS_STOPPED: &str = "STOP";

/// Result codes the processor understands. Responses carry the signed
/// integer as ASCII text inside the single-int XML template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultCode {
    Approved,
    InvalidCard,
    TxTimeout,
    AuthenticationFail,
    DoNotHonor,
    NotSufficientFunds,
    ExceedsWithdraw,
    InvalidAmount,
    SecurityViolation,
    IncorrectPin,
    PinTriesExceeded,
    InvalidPinBlock,
    PinLengthError,
    ExpiredCard,
    SuspectedFraud,
    LostCard,
    StolenCard,
}

impl ResultCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultCode::Approved => "1",
            ResultCode::InvalidCard => "-4",
            ResultCode::TxTimeout => "-7",
            ResultCode::AuthenticationFail => "-8",
            ResultCode::DoNotHonor => "-9",
            ResultCode::NotSufficientFunds => "-17",
            ResultCode::ExceedsWithdraw => "-18",
            ResultCode::InvalidAmount => "-19",
            ResultCode::SecurityViolation => "-24",
            ResultCode::IncorrectPin => "-25",
            ResultCode::PinTriesExceeded => "-26",
            ResultCode::InvalidPinBlock => "-27",
            ResultCode::PinLengthError => "-28",
            ResultCode::ExpiredCard => "-36",
            ResultCode::SuspectedFraud => "-37",
            ResultCode::LostCard => "-38",
            ResultCode::StolenCard => "-39",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ResultCode::Approved => "Approved",
            ResultCode::InvalidCard => "Invalid card number",
            ResultCode::TxTimeout => "Transaction timeout",
            ResultCode::AuthenticationFail => "Authentication failed",
            ResultCode::DoNotHonor => "Do not honor",
            ResultCode::NotSufficientFunds => "Not sufficient funds",
            ResultCode::ExceedsWithdraw => "Exceeds withdrawal amount limit",
            ResultCode::InvalidAmount => "Invalid amount",
            ResultCode::SecurityViolation => "Security violation",
            ResultCode::IncorrectPin => "Incorrect PIN",
            ResultCode::PinTriesExceeded => "Allowable PIN tries exceeded",
            ResultCode::InvalidPinBlock => "Invalid PIN block",
            ResultCode::PinLengthError => "PIN length error",
            ResultCode::ExpiredCard => "Expired card",
            ResultCode::SuspectedFraud => "Suspected fraud",
            ResultCode::LostCard => "Lost card",
            ResultCode::StolenCard => "Stolen card",
        }
    }
}

/// Ledger transaction types, one per protocol method that writes a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    Deduct,
    DeductAdjustment,
    DeductReversal,
    LoadAuth,
    LoadAdjustment,
    LoadReversal,
    LoadAuthReversal,
    CardStop,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deduct => "DEDUC",
            TransactionType::DeductAdjustment => "DEADJ",
            TransactionType::DeductReversal => "DEREV",
            TransactionType::LoadAuth => "LOAUT",
            TransactionType::LoadAdjustment => "LOADJ",
            TransactionType::LoadReversal => "LOREV",
            TransactionType::LoadAuthReversal => "LOARE",
            TransactionType::CardStop => "CRDST",
        }
    }
}

/// Ledger operations: withdraw rows subtract, deposit rows add, info rows
/// record an observed event without moving balances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxOperation {
    Withdraw,
    Deposit,
    Info,
}

impl TxOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxOperation::Withdraw => "W",
            TxOperation::Deposit => "D",
            TxOperation::Info => "I",
        }
    }
}
