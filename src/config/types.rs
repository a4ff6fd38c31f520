//! Configuration type definitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Target screen used to scale normalized cursor coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenConfig {
    /// Screen width in pixels
    #[serde(default = "default_width")]
    pub width: u32,

    /// Screen height in pixels
    #[serde(default = "default_height")]
    pub height: u32,
}

fn default_width() -> u32 {
    1920
}
fn default_height() -> u32 {
    1080
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

impl std::str::FromStr for ScreenConfig {
    type Err = String;

    /// Parse `WIDTHxHEIGHT`, e.g. `2560x1440`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", s))?;
        let width = w
            .trim()
            .parse()
            .map_err(|_| format!("invalid width '{}'", w))?;
        let height = h
            .trim()
            .parse()
            .map_err(|_| format!("invalid height '{}'", h))?;
        Ok(Self { width, height })
    }
}

/// Step sizes applied per qualifying frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlConfig {
    /// Brightness step in percent points (level range 0-100)
    #[serde(default = "default_brightness_step")]
    pub brightness_step: i32,

    /// Volume step as a scalar (level range 0.0-1.0)
    #[serde(default = "default_volume_step")]
    pub volume_step: f64,

    /// Scroll amount per frame
    #[serde(default = "default_scroll_step")]
    pub scroll_step: f64,
}

fn default_brightness_step() -> i32 {
    10
}
fn default_volume_step() -> f64 {
    0.05
}
fn default_scroll_step() -> f64 {
    0.5
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            brightness_step: default_brightness_step(),
            volume_step: default_volume_step(),
            scroll_step: default_scroll_step(),
        }
    }
}

/// Frame ingestion configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Process one frame out of every N (1 = every frame)
    #[serde(default = "default_process_every_nth")]
    pub process_every_nth: u32,

    /// Maximum hand observations considered per frame
    #[serde(default = "default_max_hands")]
    pub max_hands: usize,
}

fn default_process_every_nth() -> u32 {
    2
}
fn default_max_hands() -> usize {
    2
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            process_every_nth: default_process_every_nth(),
            max_hands: default_max_hands(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level ("trace", "debug", "info", "warn", "error")
    #[serde(default = "default_level")]
    pub level: String,

    /// Console format ("pretty", "compact", "json")
    #[serde(default = "default_format")]
    pub format: String,

    /// Directory for log files (None = console only)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_level() -> String {
    "info".to_string()
}
fn default_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
            log_dir: None,
        }
    }
}
