use authex_primitives::GatewayError;
use rust_decimal::Decimal;

/// Parses a processor amount string (ASCII decimal, minor units, at least
/// two digits) into a two-fractional-digit decimal: `"02500"` is `25.00`.
pub fn parse_minor_units(amount: &str) -> Result<Decimal, GatewayError> {
    if amount.len() < 2 {
        return Err(GatewayError::Amount(format!(
            "amount {:?} is shorter than two digits",
            amount
        )));
    }
    if !amount.bytes().all(|b| b.is_ascii_digit()) {
        return Err(GatewayError::Amount(format!(
            "amount {:?} is not numeric",
            amount
        )));
    }
    let minor: i64 = amount
        .parse()
        .map_err(|e| GatewayError::Amount(format!("amount {:?}: {}", amount, e)))?;
    Ok(Decimal::new(minor, 2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn scales_minor_units_to_two_fractional_digits() {
        assert_eq!(parse_minor_units("02500").unwrap(), Decimal::new(2500, 2));
        assert_eq!(parse_minor_units("12345").unwrap(), Decimal::new(12345, 2));
    }

    #[test]
    fn two_digit_strings_are_pure_fractions() {
        assert_eq!(parse_minor_units("45").unwrap(), Decimal::new(45, 2));
        assert_eq!(parse_minor_units("00").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn rejects_short_or_non_numeric_strings() {
        assert!(parse_minor_units("").is_err());
        assert!(parse_minor_units("5").is_err());
        assert!(parse_minor_units("12a4").is_err());
        assert!(parse_minor_units("-125").is_err());
        assert!(parse_minor_units("1 25").is_err());
    }
}
