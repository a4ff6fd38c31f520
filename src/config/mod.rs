//! Configuration management
//!
//! Handles loading, validation, and merging of configuration from:
//! - TOML files
//! - Built-in threshold profiles
//! - CLI arguments

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub mod profiles;
pub mod types;

pub use profiles::{ProfileSet, ThresholdProfile, DEFAULT_PROFILE};
pub use types::{ControlConfig, IngestConfig, LoggingConfig, ScreenConfig};

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Name of the threshold profile selected at startup
    #[serde(default = "default_active_profile")]
    pub active_profile: String,
    /// Screen configuration
    #[serde(default)]
    pub screen: ScreenConfig,
    /// Control step configuration
    #[serde(default)]
    pub control: ControlConfig,
    /// Ingestion configuration
    #[serde(default)]
    pub ingest: IngestConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Threshold profiles; file entries overlay the built-ins
    #[serde(default = "ProfileSet::empty")]
    pub profiles: ProfileSet,
}

fn default_active_profile() -> String {
    DEFAULT_PROFILE.to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config = Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse a TOML document, merging file profiles over the built-ins
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content)?;
        config.profiles = ProfileSet::builtin().merge(config.profiles);
        Ok(config)
    }

    /// Load `path` if given, else the default location if it exists, else defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(path),
            _ => Self::default_config(),
        }
    }

    /// Create default configuration
    pub fn default_config() -> Result<Self> {
        Ok(Self::default())
    }

    /// `$XDG_CONFIG_HOME/air-gesture/config.toml` (or the platform equivalent)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("air-gesture").join("config.toml"))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.profiles.validate().context("Invalid threshold profile")?;

        self.profiles
            .resolve(&self.active_profile)
            .context("Invalid active_profile")?;

        if self.screen.width == 0 || self.screen.height == 0 {
            anyhow::bail!(
                "Screen dimensions must be non-zero, got {}x{}",
                self.screen.width,
                self.screen.height
            );
        }

        if self.control.brightness_step <= 0 {
            anyhow::bail!(
                "brightness_step must be positive, got {}",
                self.control.brightness_step
            );
        }
        for (name, value) in [
            ("volume_step", self.control.volume_step),
            ("scroll_step", self.control.scroll_step),
        ] {
            if !(value.is_finite() && value > 0.0) {
                anyhow::bail!("{} must be positive, got {}", name, value);
            }
        }

        if self.ingest.process_every_nth == 0 {
            anyhow::bail!("process_every_nth must be at least 1");
        }
        if !(1..=2).contains(&self.ingest.max_hands) {
            anyhow::bail!(
                "max_hands must be 1 or 2, got {}",
                self.ingest.max_hands
            );
        }

        match self.logging.format.as_str() {
            "pretty" | "compact" | "json" => {}
            _ => anyhow::bail!("Invalid log format: {}", self.logging.format),
        }

        Ok(())
    }

    /// Override config with CLI arguments
    pub fn with_overrides(
        mut self,
        profile: Option<String>,
        frame_skip: Option<u32>,
        screen: Option<ScreenConfig>,
    ) -> Result<Self> {
        if let Some(profile) = profile {
            self.active_profile = profile;
        }
        if let Some(n) = frame_skip {
            self.ingest.process_every_nth = n;
        }
        if let Some(screen) = screen {
            self.screen = screen;
        }

        self.validate()?;
        Ok(self)
    }

    /// Threshold profile named by `active_profile`
    pub fn active_threshold_profile(&self) -> crate::error::Result<&ThresholdProfile> {
        self.profiles.resolve(&self.active_profile)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            active_profile: default_active_profile(),
            screen: ScreenConfig::default(),
            control: ControlConfig::default(),
            ingest: IngestConfig::default(),
            logging: LoggingConfig::default(),
            profiles: ProfileSet::builtin(),
        }
    }
}
