use authex_primitives::GatewayError;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA-256 over the canonical request string, keyed with the terminal
/// password, rendered as uppercase hex.
pub fn compute(key: &[u8], data: &str) -> Result<String, GatewayError> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|_| GatewayError::Config("invalid terminal password key".into()))?;
    mac.update(data.as_bytes());
    Ok(hex::encode_upper(mac.finalize().into_bytes()))
}

/// Exact-string comparison against the supplied checksum, in constant time.
pub fn verify(key: &[u8], data: &str, provided: &str) -> Result<bool, GatewayError> {
    let expected = compute(key, data)?;
    Ok(expected.as_bytes().ct_eq(provided.as_bytes()).unwrap_u8() == 1)
}
