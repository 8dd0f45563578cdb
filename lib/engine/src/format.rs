use regex::Regex;
use std::sync::LazyLock;

/// The lexical grammar of floating-point numbers.
#[allow(clippy::expect_used, reason = "The pattern is a valid constant")]
static NUMERIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").expect("valid numeric pattern")
});

/// Magnitude from which an `f64` has no fractional digits left to round.
const ROUNDING_LIMIT: f64 = 1e15;

/// Formats a cell value for display.
///
/// Values that look like floating-point numbers are rounded to at most two fractional digits
/// without trailing zeros (the `#.##` pattern). Integer literals keep all their digits. All other
/// values are returned unchanged.
pub fn format_value(value: &str) -> String {
    let trimmed = value.trim();
    if !NUMERIC.is_match(trimmed) {
        return value.to_owned();
    }
    if !trimmed.contains(['.', 'e', 'E']) {
        return trimmed.to_owned();
    }
    match trimmed.parse::<f64>() {
        Ok(number) => format_number(number),
        Err(_) => value.to_owned(),
    }
}

/// Rounds `number` to two fractional digits and drops trailing zeros.
pub fn format_number(number: f64) -> String {
    if !number.is_finite() || number.abs() >= ROUNDING_LIMIT {
        return number.to_string();
    }
    let rounded = (number * 100.0).round() / 100.0;
    if rounded == 0.0 {
        // Avoids "-0".
        return "0".to_owned();
    }
    rounded.to_string()
}
