//! Threshold Profiles
//!
//! Named bundles of gesture thresholds and smoothing/cooldown parameters.
//! Exactly one profile is active at a time; the set of profiles is plain
//! data, so adding one needs no code change.
//!
//! # Built-in profiles
//!
//! | Profile | Pinch | Apart | Together | Namaste | Smoothing | Cooldown |
//! |---------|-------|-------|----------|---------|-----------|----------|
//! | default | 0.05 | 0.07 | 0.05 | 0.10 | 0.8 | 2.0s |
//! | precise | 0.10 | 0.12 | 0.04 | 0.10 | 0.4 | 1.0s |
//! | responsive | 0.15 | 0.18 | 0.05 | 0.10 | 0.2 | 1.0s |

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::error::{GestureError, Result};

/// Name of the profile used when none is configured
pub const DEFAULT_PROFILE: &str = "default";

/// Gesture thresholds for one named profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdProfile {
    /// Index-thumb (and middle-thumb) distance below which a pinch/tap holds
    pub pinch_distance: f64,

    /// Index-middle distance above which the fingers count as apart
    pub fingers_apart_distance: f64,

    /// Index-middle distance below which the fingers count as together
    pub fingers_together_distance: f64,

    /// Wrist-to-wrist planar distance below which two hands form namaste
    pub namaste_distance: f64,

    /// Cursor smoothing factor α in (0, 1]; higher follows the raw target faster
    pub cursor_smoothing: f64,

    /// Minimum seconds between two task-view triggers
    pub palm_open_cooldown: f64,
}

impl ThresholdProfile {
    /// Built-in `default` profile
    pub fn standard() -> Self {
        Self {
            pinch_distance: 0.05,
            fingers_apart_distance: 0.07,
            fingers_together_distance: 0.05,
            namaste_distance: 0.1,
            cursor_smoothing: 0.8,
            palm_open_cooldown: 2.0,
        }
    }

    /// Built-in `precise` profile: tighter pinch, heavier smoothing
    pub fn precise() -> Self {
        Self {
            pinch_distance: 0.1,
            fingers_apart_distance: 0.12,
            fingers_together_distance: 0.04,
            namaste_distance: 0.1,
            cursor_smoothing: 0.4,
            palm_open_cooldown: 1.0,
        }
    }

    /// Built-in `responsive` profile: loose thresholds, light smoothing
    pub fn responsive() -> Self {
        Self {
            pinch_distance: 0.15,
            fingers_apart_distance: 0.18,
            fingers_together_distance: 0.05,
            namaste_distance: 0.1,
            cursor_smoothing: 0.2,
            palm_open_cooldown: 1.0,
        }
    }

    /// Cooldown as a [`Duration`]
    pub fn palm_open_cooldown(&self) -> Duration {
        Duration::try_from_secs_f64(self.palm_open_cooldown.max(0.0)).unwrap_or(Duration::MAX)
    }

    /// Validate value ranges
    pub fn validate(&self) -> Result<()> {
        let distances = [
            ("pinch_distance", self.pinch_distance),
            ("fingers_apart_distance", self.fingers_apart_distance),
            ("fingers_together_distance", self.fingers_together_distance),
            ("namaste_distance", self.namaste_distance),
        ];
        for (name, value) in distances {
            if !(value.is_finite() && value > 0.0) {
                return Err(GestureError::InvalidProfile(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }

        if !(self.cursor_smoothing > 0.0 && self.cursor_smoothing <= 1.0) {
            return Err(GestureError::InvalidProfile(format!(
                "cursor_smoothing must be in (0, 1], got {}",
                self.cursor_smoothing
            )));
        }

        if !(self.palm_open_cooldown.is_finite() && self.palm_open_cooldown >= 0.0) {
            return Err(GestureError::InvalidProfile(format!(
                "palm_open_cooldown must be >= 0, got {}",
                self.palm_open_cooldown
            )));
        }
        if Duration::try_from_secs_f64(self.palm_open_cooldown).is_err() {
            return Err(GestureError::InvalidProfile(format!(
                "palm_open_cooldown is too large, got {}",
                self.palm_open_cooldown
            )));
        }

        Ok(())
    }
}

impl Default for ThresholdProfile {
    fn default() -> Self {
        Self::standard()
    }
}

/// Registry of named profiles.
///
/// Names are stored lowercase; lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, ThresholdProfile>",
    into = "BTreeMap<String, ThresholdProfile>"
)]
pub struct ProfileSet {
    profiles: BTreeMap<String, ThresholdProfile>,
}

impl From<BTreeMap<String, ThresholdProfile>> for ProfileSet {
    fn from(raw: BTreeMap<String, ThresholdProfile>) -> Self {
        let profiles = raw
            .into_iter()
            .map(|(name, profile)| (name.to_lowercase(), profile))
            .collect();
        Self { profiles }
    }
}

impl From<ProfileSet> for BTreeMap<String, ThresholdProfile> {
    fn from(set: ProfileSet) -> Self {
        set.profiles
    }
}

impl ProfileSet {
    /// Registry holding only the built-in profiles
    pub fn builtin() -> Self {
        let mut profiles = BTreeMap::new();
        profiles.insert(DEFAULT_PROFILE.to_string(), ThresholdProfile::standard());
        profiles.insert("precise".to_string(), ThresholdProfile::precise());
        profiles.insert("responsive".to_string(), ThresholdProfile::responsive());
        Self { profiles }
    }

    /// Empty registry
    pub fn empty() -> Self {
        Self {
            profiles: BTreeMap::new(),
        }
    }

    /// Add or replace a profile
    pub fn insert(&mut self, name: &str, profile: ThresholdProfile) {
        self.profiles.insert(name.to_lowercase(), profile);
    }

    /// Look up a profile by name
    pub fn get(&self, name: &str) -> Option<&ThresholdProfile> {
        self.profiles.get(&name.to_lowercase())
    }

    /// Look up a profile, failing with [`GestureError::UnknownProfile`]
    pub fn resolve(&self, name: &str) -> Result<&ThresholdProfile> {
        self.get(name)
            .ok_or_else(|| GestureError::UnknownProfile(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Profile names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ThresholdProfile)> {
        self.profiles.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Overlay `other` on top of `self`; same-named profiles are replaced
    pub fn merge(mut self, other: ProfileSet) -> Self {
        for (name, profile) in other.profiles {
            self.profiles.insert(name.to_lowercase(), profile);
        }
        self
    }

    /// Validate every profile
    pub fn validate(&self) -> Result<()> {
        for (name, profile) in &self.profiles {
            profile.validate().map_err(|e| match e {
                GestureError::InvalidProfile(msg) => {
                    GestureError::InvalidProfile(format!("{}: {}", name, msg))
                }
                other => other,
            })?;
        }
        Ok(())
    }
}

impl Default for ProfileSet {
    fn default() -> Self {
        Self::builtin()
    }
}
