//! Monthly price calculation.
//!
//! Catalog prices arrive as display strings (`"700"`, `"150 ₽/мес"`).
//! They are read leniently: leading whitespace, an optional sign, then the
//! leading run of ASCII digits. Anything unparsable counts as zero, and a
//! digit run too long for `i64` saturates.
//! Amounts are whole currency units; there is no fractional handling.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

use crate::catalog::{SpeedTier, Tariff};

/// A whole-unit currency amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(pub i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Get raw value.
    #[inline]
    pub fn raw(self) -> i64 {
        self.0
    }

    /// Parse a catalog price string, treating anything unparsable as zero.
    ///
    /// Digit runs beyond the `i64` range saturate at `i64::MAX`/`i64::MIN`.
    pub fn parse_lenient(text: &str) -> Self {
        let trimmed = text.trim_start();
        let (negative, digits) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };

        let end = digits
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(digits.len());

        let digits = &digits[..end];
        if digits.is_empty() {
            return Amount::ZERO;
        }

        // A non-empty digit run only fails to parse on overflow
        match digits.parse::<i64>() {
            Ok(value) if negative => Amount(-value),
            Ok(value) => Amount(value),
            Err(_) if negative => Amount(i64::MIN),
            Err(_) => Amount(i64::MAX),
        }
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0.saturating_add(rhs.0))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ₽", self.0)
    }
}

// Allow `amount == 650` comparisons
impl PartialEq<i64> for Amount {
    fn eq(&self, other: &i64) -> bool {
        self.0 == *other
    }
}

/// Monthly total for a speed tier plus the optional equipment rental.
///
/// Pure: the same inputs always produce the same amount.
pub fn compute_total(
    speed: &SpeedTier,
    wants_equipment: bool,
    equipment_rental_fee: Option<&str>,
) -> Amount {
    let base = Amount::parse_lenient(&speed.price);
    let equipment = match (wants_equipment, equipment_rental_fee) {
        (true, Some(fee)) => Amount::parse_lenient(fee),
        _ => Amount::ZERO,
    };
    base + equipment
}

/// Monthly total for a tariff/speed pair.
pub fn compute_for_tariff(tariff: &Tariff, speed: &SpeedTier, wants_equipment: bool) -> Amount {
    compute_total(
        speed,
        wants_equipment,
        tariff.equipment_rental_fee.as_deref(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier(price: &str) -> SpeedTier {
        SpeedTier::new("300", "Мбит/с", price)
    }

    #[test]
    fn test_parse_plain_number() {
        assert_eq!(Amount::parse_lenient("700"), 700);
        assert_eq!(Amount::parse_lenient("  42"), 42);
    }

    #[test]
    fn test_parse_stops_at_first_non_digit() {
        assert_eq!(Amount::parse_lenient("150 ₽/мес"), 150);
        assert_eq!(Amount::parse_lenient("1 000"), 1);
        assert_eq!(Amount::parse_lenient("99.90"), 99);
    }

    #[test]
    fn test_parse_unparsable_is_zero() {
        assert_eq!(Amount::parse_lenient(""), 0);
        assert_eq!(Amount::parse_lenient("бесплатно"), 0);
        assert_eq!(Amount::parse_lenient("-"), 0);
    }

    #[test]
    fn test_parse_overflow_saturates() {
        assert_eq!(Amount::parse_lenient("99999999999999999999"), Amount(i64::MAX));
        assert_eq!(Amount::parse_lenient("-99999999999999999999 ₽"), Amount(i64::MIN));
        assert_eq!(Amount::parse_lenient("9223372036854775807"), Amount(i64::MAX));
    }

    #[test]
    fn test_parse_sign() {
        assert_eq!(Amount::parse_lenient("-50"), -50);
        assert_eq!(Amount::parse_lenient("+50"), 50);
    }

    #[test]
    fn test_total_with_equipment() {
        let total = compute_total(&tier("500"), true, Some("150 ₽/мес"));
        assert_eq!(total, 650);
    }

    #[test]
    fn test_total_without_equipment_ignores_fee() {
        let total = compute_total(&tier("500"), false, Some("150 ₽/мес"));
        assert_eq!(total, 500);
    }

    #[test]
    fn test_total_missing_or_bad_fee() {
        assert_eq!(compute_total(&tier("500"), true, None), 500);
        assert_eq!(compute_total(&tier("500"), true, Some("по запросу")), 500);
        assert_eq!(compute_total(&tier("n/a"), true, Some("150")), 150);
    }

    #[test]
    fn test_display() {
        assert_eq!(Amount(650).to_string(), "650 ₽");
    }
}
