//! Shared helpers for spreadsheet cell parsing and fixed-precision formatting.
//!
//! Spreadsheet cells arrive as display strings ("12.5", "12.5mm", "", "n/a").
//! Numbers are read from the leading numeric prefix of the cell, so trailing
//! units are tolerated and anything without a leading number is "not a number".
//!
//! Rounding is half away from zero on the exact binary value of the f64
//! (`0.125` → `0.13`, but `1.005` → `1.00` because 1.005 is stored as
//! 1.00499999...). It is done in `Decimal` so that the printed value always
//! carries exactly the requested decimal places.

use rust_decimal::{Decimal, RoundingStrategy};

/// Placeholder shown for missing or non-numeric values.
pub const NOT_AVAILABLE: &str = "N/A";

/// Parse the leading floating-point number of a cell.
///
/// Leading whitespace is skipped, then an optional sign, digits with at most
/// one decimal point, and an optional exponent are consumed. Trailing text is
/// ignored. Returns `None` when no digits are found or the value is not finite.
pub(crate) fn parse_leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let mut digits = 0;
    let mut seen_dot = false;
    while let Some(&b) = bytes.get(end) {
        match b {
            b'0'..=b'9' => digits += 1,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }
    if digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it.
    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits = bytes[exp_end..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Round an f64 half away from zero to `places` decimals.
///
/// The f64 is taken at its exact binary value, not its shortest decimal
/// form, so `2.675` rounds to `2.67`.
///
/// The result always has exactly `places` digits after the point, so
/// `15.0` at 2 places displays as `15.00`. `None` for values `Decimal`
/// cannot represent.
pub(crate) fn round_to_places(v: f64, places: u32) -> Option<Decimal> {
    if !v.is_finite() {
        tracing::warn!("round_to_places received non-finite value {}", v);
        return None;
    }
    let mut d = Decimal::from_f64_retain(v)?
        .round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    d.rescale(places);
    Some(d)
}

/// Format a raw cell as a fixed-precision number, or [`NOT_AVAILABLE`].
pub(crate) fn format_fixed(cell: Option<&str>, places: u32) -> String {
    cell.and_then(parse_leading_float)
        .and_then(|v| round_to_places(v, places))
        .map(|d| d.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}
