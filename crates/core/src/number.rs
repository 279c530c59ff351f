//! Numeric guards shared by manual edits and configuration saves.

use crate::error::{DomainError, DomainResult};

/// Accept `value` only when it is finite and `>= 0`.
pub fn non_negative_finite(field: &'static str, value: f64) -> DomainResult<f64> {
    if !value.is_finite() {
        return Err(DomainError::invalid_number(field, "must be a finite number"));
    }
    if value < 0.0 {
        return Err(DomainError::invalid_number(field, "must not be negative"));
    }
    Ok(value)
}

/// Round to the nearest integer, halves toward positive infinity.
///
/// `f64::round` rounds halves away from zero, which disagrees for negative
/// margins (-2.5 must become -2, not -3).
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_nan_infinity_and_negatives() {
        assert!(non_negative_finite("buy_price", f64::NAN).is_err());
        assert!(non_negative_finite("buy_price", f64::INFINITY).is_err());
        assert!(matches!(
            non_negative_finite("sell_price", -0.01),
            Err(DomainError::InvalidNumericInput { field: "sell_price", .. })
        ));
        assert_eq!(non_negative_finite("stock", 0.0), Ok(0.0));
    }

    #[test]
    fn halves_round_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(65.35), 65.0);
    }
}
