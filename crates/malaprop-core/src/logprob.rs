// Base-10 log-probability helpers
//
// Language models hand out log10 scores, so every probability the decoder
// combines with them is converted to log10 as well.

use std::cmp::Ordering;

/// Log10 of the impossible event.
pub const LOG_ZERO: f64 = f64::NEG_INFINITY;

/// Convert a linear probability to log10.
///
/// `0.0` maps to [`LOG_ZERO`].
#[inline]
pub fn to_log10(p: f64) -> f64 {
    if p <= 0.0 { LOG_ZERO } else { p.log10() }
}

/// Total order on log scores.
///
/// NaN sorts below every other value so that a malformed score never wins a
/// max-selection.
#[inline]
pub fn compare_scores(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.total_cmp(&b),
    }
}
