//! Exponential backoff without jitter.

use std::time::Duration;

/// Delay before retry number `retry` (1-based): `base * multiplier^(retry - 1)`.
///
/// Returns zero for `retry == 0` and saturates at `Duration::MAX`.
pub fn calculate_backoff(retry: u32, base: Duration, multiplier: f64) -> Duration {
    if retry == 0 {
        return Duration::ZERO;
    }
    let exponent = i32::try_from(retry - 1).unwrap_or(i32::MAX);
    scale(base, multiplier.powi(exponent))
}

/// Multiply a duration by a non-negative factor, saturating on overflow.
pub fn scale(delay: Duration, factor: f64) -> Duration {
    let nanos = (delay.as_nanos() as f64 * factor).round();
    if !nanos.is_finite() || nanos >= u64::MAX as f64 {
        Duration::MAX
    } else {
        Duration::from_nanos(nanos.max(0.0) as u64)
    }
}
