//! Rounding and percentage helpers.
//!
//! Every number that leaves the aggregator goes through here, so no summary
//! field can end up NaN or infinite.

/// Round to the nearest integer with halves going up (2.5 -> 3, -2.5 -> -2).
///
/// Non-finite input rounds to 0.
pub fn round_half_up(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    (value + 0.5).floor() as i64
}

/// `round(100 * numerator / denominator)`, or 0 when the denominator is not positive
pub fn percent(numerator: f64, denominator: f64) -> i64 {
    if !denominator.is_finite() || denominator <= 0.0 {
        return 0;
    }
    round_half_up(100.0 * numerator / denominator)
}

/// Clamp a percentage into `0..=100`
pub fn clamp_percent(value: i64) -> u8 {
    value.clamp(0, 100) as u8
}

/// Round to one decimal place (for averages shown with a fraction)
pub fn round_tenths(value: f64) -> f64 {
    round_half_up(value * 10.0) as f64 / 10.0
}
