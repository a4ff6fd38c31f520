//! Runtime Metrics
//!
//! Counters, gauges and timing histograms for the frame pipeline:
//! - Frame intake (received, processed, skipped by the gate)
//! - Hands dropped for malformed landmarks
//! - Commands emitted, per kind
//! - Sink failures and last known output levels
//!
//! The collector is shared behind an `Arc` between the engine and the
//! dispatcher; all maps sit behind `parking_lot` locks.

use parking_lot::RwLock;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Metrics collector for the gesture pipeline
pub struct MetricsCollector {
    counters: RwLock<BTreeMap<String, u64>>,
    gauges: RwLock<BTreeMap<String, f64>>,
    histograms: RwLock<BTreeMap<String, Histogram>>,
    start_time: Instant,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            counters: RwLock::new(BTreeMap::new()),
            gauges: RwLock::new(BTreeMap::new()),
            histograms: RwLock::new(BTreeMap::new()),
            start_time: Instant::now(),
        }
    }

    /// Increment a counter by `value`
    pub fn increment_counter(&self, name: &str, value: u64) {
        let mut counters = self.counters.write();
        *counters.entry(name.to_string()).or_insert(0) += value;
    }

    /// Count one emitted command of the given kind
    pub fn record_command(&self, kind: &str) {
        self.increment_counter(metric_names::COMMANDS_EMITTED, 1);
        self.increment_counter(&format!("{}{}", metric_names::COMMAND_PREFIX, kind), 1);
    }

    pub fn set_gauge(&self, name: &str, value: f64) {
        self.gauges.write().insert(name.to_string(), value);
    }

    pub fn record_histogram(&self, name: &str, value: f64) {
        self.histograms
            .write()
            .entry(name.to_string())
            .or_insert_with(Histogram::new)
            .record(value);
    }

    pub fn get_counter(&self, name: &str) -> Option<u64> {
        self.counters.read().get(name).copied()
    }

    /// Counter value, zero when never incremented
    pub fn counter(&self, name: &str) -> u64 {
        self.get_counter(name).unwrap_or(0)
    }

    pub fn get_gauge(&self, name: &str) -> Option<f64> {
        self.gauges.read().get(name).copied()
    }

    pub fn get_histogram(&self, name: &str) -> Option<HistogramStats> {
        self.histograms.read().get(name).map(Histogram::stats)
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            uptime: self.start_time.elapsed(),
            counters: self.counters.read().clone(),
            gauges: self.gauges.read().clone(),
            histograms: self
                .histograms
                .read()
                .iter()
                .map(|(k, v)| (k.clone(), v.stats()))
                .collect(),
        }
    }

    /// Reset all metrics
    pub fn reset(&self) {
        self.counters.write().clear();
        self.gauges.write().clear();
        self.histograms.write().clear();
    }

    /// Export metrics as JSON
    pub fn export_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.snapshot())
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Running min/max/mean over recorded values
#[derive(Debug, Clone)]
struct Histogram {
    count: u64,
    min: f64,
    max: f64,
    sum: f64,
}

impl Histogram {
    fn new() -> Self {
        Self {
            count: 0,
            min: f64::MAX,
            max: f64::MIN,
            sum: 0.0,
        }
    }

    fn record(&mut self, value: f64) {
        self.count += 1;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.sum += value;
    }

    fn stats(&self) -> HistogramStats {
        if self.count == 0 {
            return HistogramStats::default();
        }
        HistogramStats {
            count: self.count,
            min: self.min,
            max: self.max,
            mean: self.sum / self.count as f64,
        }
    }
}

/// Histogram statistics computed from recorded observations
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct HistogramStats {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// Point-in-time snapshot of all collected metrics
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    /// Time since the collector was created
    pub uptime: Duration,
    pub counters: BTreeMap<String, u64>,
    pub gauges: BTreeMap<String, f64>,
    pub histograms: BTreeMap<String, HistogramStats>,
}

impl MetricsSnapshot {
    pub fn counter(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }
}

pub mod metric_names {
    //! Metric names shared by the engine, dispatcher and binary.

    /// Frames handed to the engine
    pub const FRAMES_RECEIVED: &str = "frames_received";
    /// Frames that passed the gate and ran the state machine
    pub const FRAMES_PROCESSED: &str = "frames_processed";
    /// Frames dropped by the every-Nth gate
    pub const FRAMES_SKIPPED: &str = "frames_skipped";
    /// Frames ignored while stopped or after exit
    pub const FRAMES_IGNORED: &str = "frames_ignored";
    /// Input lines that failed to decode
    pub const FRAMES_MALFORMED: &str = "frames_malformed";
    /// Observations skipped for missing landmarks or over the hand limit
    pub const HANDS_SKIPPED: &str = "hands_skipped";
    /// Commands produced by the state machine
    pub const COMMANDS_EMITTED: &str = "commands_emitted";
    /// Per-kind command counters, e.g. `command.click`
    pub const COMMAND_PREFIX: &str = "command.";
    /// Sink executions that failed
    pub const SINK_FAILURES: &str = "sink_failures";
    /// Per-frame processing time (microseconds)
    pub const FRAME_TIME_US: &str = "frame_time_us";
    /// Last volume level written (0.0-1.0)
    pub const VOLUME_LEVEL: &str = "volume_level";
    /// Last brightness level written (0-100)
    pub const BRIGHTNESS_LEVEL: &str = "brightness_level";
}

/// Timer helper for measuring durations
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_us(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1_000_000.0
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
