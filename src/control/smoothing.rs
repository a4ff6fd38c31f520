//! Cursor Smoothing
//!
//! Exponential moving average over raw cursor targets:
//!
//! ```text
//! smoothed' = α * raw + (1 - α) * smoothed
//! ```
//!
//! The first sample bootstraps the average (`smoothed' = raw`) so the
//! cursor does not glide in from the origin.

/// One smoothing step.
///
/// Evaluated as `prev + α * (raw - prev)`, which is the same average but
/// keeps `smooth(v, Some(v), α) == v` exact in floating point.
pub fn smooth(raw: f64, previous: Option<f64>, alpha: f64) -> f64 {
    match previous {
        None => raw,
        Some(prev) => prev + alpha * (raw - prev),
    }
}
