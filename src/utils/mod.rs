//! Utility Functions
//!
//! Runtime metrics and user-friendly error formatting.
//!
//! ## Metrics
//!
//! ```rust
//! use air_gesture::utils::{metric_names, MetricsCollector};
//!
//! let metrics = MetricsCollector::new();
//! metrics.increment_counter(metric_names::FRAMES_RECEIVED, 1);
//! metrics.record_command("click");
//!
//! let snapshot = metrics.snapshot();
//! assert_eq!(snapshot.counter(metric_names::COMMANDS_EMITTED), 1);
//! ```
//!
//! ## Error Formatting
//!
//! [`format_user_error`] turns an `anyhow::Error` from the binary into a
//! boxed message with hints for the common failure categories (unknown
//! profile, configuration, frame input).

pub mod errors;
pub mod metrics;

pub use errors::format_user_error;
pub use metrics::{metric_names, HistogramStats, MetricsCollector, MetricsSnapshot, Timer};
