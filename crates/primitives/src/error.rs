use diesel::r2d2;
use std::fmt;

#[derive(Debug)]
pub enum GatewayError {
    /// Malformed envelope or a parameter vector that does not match the
    /// method schema.
    Protocol(String),
    /// Malformed KLV payload.
    Klv(String),
    /// Amount string that cannot be read as minor units.
    Amount(String),
    /// Card or wallet not in a state that allows the operation.
    NotEligible(String),
    Database(diesel::result::Error),
    DatabaseConnection(String),
    Serialization(serde_json::Error),
    /// Balance mutation aborted: the wallet row changed under the lock or
    /// the guarded update touched an unexpected number of rows.
    Ledger(String),
    Config(String),
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::Protocol(e) => write!(f, "protocol error: {}", e),
            GatewayError::Klv(e) => write!(f, "invalid KLV: {}", e),
            GatewayError::Amount(e) => write!(f, "invalid amount: {}", e),
            GatewayError::NotEligible(e) => write!(f, "not eligible: {}", e),
            GatewayError::Database(e) => write!(f, "database error: {}", e),
            GatewayError::DatabaseConnection(e) => write!(f, "database connection error: {}", e),
            GatewayError::Serialization(e) => write!(f, "serialization error: {}", e),
            GatewayError::Ledger(e) => write!(f, "ledger error: {}", e),
            GatewayError::Config(e) => write!(f, "configuration error: {}", e),
        }
    }
}

impl std::error::Error for GatewayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GatewayError::Database(e) => Some(e),
            GatewayError::Serialization(e) => Some(e),
            _ => None,
        }
    }
}

impl From<diesel::result::Error> for GatewayError {
    fn from(err: diesel::result::Error) -> Self {
        GatewayError::Database(err)
    }
}

impl From<r2d2::Error> for GatewayError {
    fn from(err: r2d2::Error) -> Self {
        GatewayError::DatabaseConnection(err.to_string())
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Serialization(err)
    }
}
