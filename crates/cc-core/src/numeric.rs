//! Float helpers for range handling.

use crate::CoreError;

/// Reject NaN and infinities where a bound or parameter must be usable.
pub fn ensure_finite(v: f64, what: &'static str) -> Result<f64, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Clamp `v` into `[min, max]` without ever failing.
///
/// NaN maps to `min`; infinities saturate at the nearest bound.
/// Requires `min <= max`.
pub fn saturate(v: f64, min: f64, max: f64) -> f64 {
    if v.is_nan() { min } else { v.clamp(min, max) }
}
