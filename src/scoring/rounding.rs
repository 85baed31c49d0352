use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Round to two decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    round_to(value, 2)
}

/// Round to `places` decimals, half away from zero.
///
/// Rounding is done on the shortest decimal representation of `value`, so
/// `1.005` rounds to `1.01` even though the nearest binary double sits just
/// below it. Values outside the decimal range fall back to float rounding.
pub fn round_to(value: f64, places: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }

    let rounded = Decimal::from_str(&value.to_string())
        .ok()
        .map(|d| d.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64());

    // + 0.0 folds -0.0 into 0.0
    match rounded {
        Some(r) => r + 0.0,
        // Already integral at this magnitude
        None if value.abs() >= MAX_EXACT_INTEGER => value,
        None => {
            let scale = 10f64.powi(places as i32);
            (value * scale).round() / scale + 0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2_plain() {
        assert_eq!(round2(80.0), 80.0);
        assert_eq!(round2(12.344), 12.34);
        assert_eq!(round2(12.346), 12.35);
    }

    #[test]
    fn test_round2_half_goes_away_from_zero() {
        assert_eq!(round2(1.005), 1.01);
        assert_eq!(round2(2.675), 2.68);
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(-1.005), -1.01);
        assert_eq!(round2(-0.125), -0.13);
    }

    #[test]
    fn test_round2_below_half_goes_down() {
        assert_eq!(round2(1.0049), 1.0);
        assert_eq!(round2(-1.0049), -1.0);
    }

    #[test]
    fn test_round2_negative_zero_normalised() {
        let r = round2(-0.001);
        assert_eq!(r, 0.0);
        assert!(r.is_sign_positive());
    }

    #[test]
    fn test_round2_non_finite_passthrough() {
        assert!(round2(f64::NAN).is_nan());
        assert_eq!(round2(f64::INFINITY), f64::INFINITY);
    }

    #[test]
    fn test_round2_huge_value_falls_back() {
        let huge = 1.0e40;
        assert_eq!(round2(huge), huge);
    }
}
