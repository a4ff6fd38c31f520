//! Volume and brightness levels
//!
//! Level commands are relative: the current value is read, the signed step
//! applied, the result clamped (volume to 0.0-1.0, brightness to 0-100)
//! and written back. When the backend fails the last successfully read or
//! written value stays as the displayed level.

#[cfg(test)]
use mockall::automock;
use std::sync::Arc;
use tracing::debug;

use super::command::Command;
use super::sink::CommandSink;
use crate::error::Result;
use crate::utils::{metric_names, MetricsCollector};

pub const VOLUME_RANGE: (f64, f64) = (0.0, 1.0);
pub const BRIGHTNESS_RANGE: (i32, i32) = (0, 100);

/// Backend holding the system volume and display brightness
#[cfg_attr(test, automock)]
pub trait LevelControl {
    fn volume(&self) -> Result<f64>;
    fn set_volume(&mut self, level: f64) -> Result<()>;
    fn brightness(&self) -> Result<i32>;
    fn set_brightness(&mut self, level: i32) -> Result<()>;
}

/// In-memory levels for dry runs and tests
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatedLevels {
    pub volume: f64,
    pub brightness: i32,
}

impl SimulatedLevels {
    pub fn new(volume: f64, brightness: i32) -> Self {
        Self { volume, brightness }
    }
}

impl Default for SimulatedLevels {
    fn default() -> Self {
        Self::new(0.5, 50)
    }
}

impl LevelControl for SimulatedLevels {
    fn volume(&self) -> Result<f64> {
        Ok(self.volume)
    }

    fn set_volume(&mut self, level: f64) -> Result<()> {
        self.volume = level;
        Ok(())
    }

    fn brightness(&self) -> Result<i32> {
        Ok(self.brightness)
    }

    fn set_brightness(&mut self, level: i32) -> Result<()> {
        self.brightness = level;
        Ok(())
    }
}

/// Read-step-clamp-write over a [`LevelControl`]
pub struct LevelAdjuster<L: LevelControl> {
    control: L,
    displayed_volume: Option<f64>,
    displayed_brightness: Option<i32>,
}

impl<L: LevelControl> LevelAdjuster<L> {
    pub fn new(control: L) -> Self {
        Self {
            control,
            displayed_volume: None,
            displayed_brightness: None,
        }
    }

    /// Apply a volume delta, returning the new level
    pub fn adjust_volume(&mut self, delta: f64) -> Result<f64> {
        let current = self.control.volume()?;
        self.displayed_volume = Some(current);

        let (lo, hi) = VOLUME_RANGE;
        let next = (current + delta).clamp(lo, hi);
        self.control.set_volume(next)?;
        self.displayed_volume = Some(next);
        debug!(current, next, "Volume adjusted");
        Ok(next)
    }

    /// Apply a brightness delta, returning the new level
    pub fn adjust_brightness(&mut self, delta: i32) -> Result<i32> {
        let current = self.control.brightness()?;
        self.displayed_brightness = Some(current);

        let (lo, hi) = BRIGHTNESS_RANGE;
        let next = current.saturating_add(delta).clamp(lo, hi);
        self.control.set_brightness(next)?;
        self.displayed_brightness = Some(next);
        debug!(current, next, "Brightness adjusted");
        Ok(next)
    }

    /// Last known volume
    pub fn displayed_volume(&self) -> Option<f64> {
        self.displayed_volume
    }

    /// Last known brightness
    pub fn displayed_brightness(&self) -> Option<i32> {
        self.displayed_brightness
    }

    pub fn control(&self) -> &L {
        &self.control
    }
}

/// Applies level commands to a backend and forwards every successful
/// command to an inner sink.
pub struct LevelSink<L: LevelControl, S: CommandSink> {
    adjuster: LevelAdjuster<L>,
    inner: S,
    metrics: Option<Arc<MetricsCollector>>,
}

impl<L: LevelControl, S: CommandSink> LevelSink<L, S> {
    pub fn new(control: L, inner: S) -> Self {
        Self {
            adjuster: LevelAdjuster::new(control),
            inner,
            metrics: None,
        }
    }

    /// Publish written levels as gauges
    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn adjuster(&self) -> &LevelAdjuster<L> {
        &self.adjuster
    }

    fn gauge(&self, name: &str, value: f64) {
        if let Some(metrics) = &self.metrics {
            metrics.set_gauge(name, value);
        }
    }
}

impl<L: LevelControl, S: CommandSink> CommandSink for LevelSink<L, S> {
    fn execute(&mut self, command: &Command) -> Result<()> {
        match *command {
            Command::AdjustVolume { delta } => {
                let level = self.adjuster.adjust_volume(delta)?;
                self.gauge(metric_names::VOLUME_LEVEL, level);
            }
            Command::AdjustBrightness { delta } => {
                let level = self.adjuster.adjust_brightness(delta)?;
                self.gauge(metric_names::BRIGHTNESS_LEVEL, level as f64);
            }
            _ => {}
        }
        self.inner.execute(command)
    }

    fn flush(&mut self) -> Result<()> {
        self.inner.flush()
    }
}
