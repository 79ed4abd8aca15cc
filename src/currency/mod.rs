//! Currency codes, rounding semantics, and amount formatting.
//!
//! Monetary amounts are plain `f64` values; every comparison against zero or
//! between amounts goes through a per-currency rounding precision so that
//! sub-cent noise from repeated splits never flips a sign.

use std::cmp::Ordering;
use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static SYMBOLS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("USD", "$"),
        ("EUR", "€"),
        ("GBP", "£"),
        ("JPY", "¥"),
        ("CHF", "CHF"),
    ])
});

/// Rounding precision applied when no currency is configured.
pub const DEFAULT_ROUNDING: f64 = 0.01;

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Smallest representable amount for this currency.
    pub fn rounding(&self) -> f64 {
        match minor_units_for(self.as_str()) {
            0 => 1.0,
            3 => 0.001,
            _ => DEFAULT_ROUNDING,
        }
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("EUR")
    }
}

/// Rounds `value` to the nearest multiple of `rounding`.
pub fn round_to(value: f64, rounding: f64) -> f64 {
    if rounding <= 0.0 {
        return value;
    }
    (value / rounding).round() * rounding
}

/// Compares two amounts at the given rounding precision.
///
/// Amounts closer than half the precision are considered equal.
pub fn compare(a: f64, b: f64, rounding: f64) -> Ordering {
    let delta = a - b;
    if delta.abs() < rounding / 2.0 {
        Ordering::Equal
    } else if delta > 0.0 {
        Ordering::Greater
    } else {
        Ordering::Less
    }
}

/// True when `value` rounds to zero at the given precision.
pub fn is_zero(value: f64, rounding: f64) -> bool {
    compare(value, 0.0, rounding) == Ordering::Equal
}

pub fn symbol_for(code: &str) -> String {
    SYMBOLS.get(code).copied().unwrap_or(code).to_string()
}

pub fn minor_units_for(code: &str) -> u8 {
    match code {
        "JPY" => 0,
        "KWD" | "BHD" => 3,
        _ => 2,
    }
}

/// Formats an amount with the currency symbol and its native precision.
pub fn format_amount(amount: f64, code: &CurrencyCode) -> String {
    let precision = minor_units_for(code.as_str()) as usize;
    let symbol = symbol_for(code.as_str());
    if amount < 0.0 {
        format!("-{}{:.*}", symbol, precision, amount.abs())
    } else {
        format!("{}{:.*}", symbol, precision, amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compare_respects_rounding() {
        assert_eq!(compare(0.004, 0.0, DEFAULT_ROUNDING), Ordering::Equal);
        assert_eq!(compare(0.006, 0.0, DEFAULT_ROUNDING), Ordering::Greater);
        assert_eq!(compare(-0.006, 0.0, DEFAULT_ROUNDING), Ordering::Less);
    }

    #[test]
    fn round_to_nearest_cent() {
        assert_eq!(round_to(12.345, 0.01), 12.35);
        assert_eq!(round_to(12.344, 0.01), 12.34);
    }

    #[test]
    fn zero_rounding_is_identity() {
        assert_eq!(round_to(12.345, 0.0), 12.345);
    }

    #[test]
    fn formats_negative_amounts() {
        let eur = CurrencyCode::new("eur");
        assert_eq!(format_amount(-12.5, &eur), "-€12.50");
        let yen = CurrencyCode::new("JPY");
        assert_eq!(format_amount(1200.0, &yen), "¥1200");
    }
}
