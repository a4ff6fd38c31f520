//! Hand landmark data model.
//!
//! Models the 21 landmarks per hand produced by an external hand-landmark
//! detector (MediaPipe convention), plus the handedness label and the
//! per-frame grouping of observations.
//!
//! Coordinates are image-relative: `x` and `y` are roughly in `[0, 1]` with
//! `y` growing downward, `z` is relative depth with no absolute unit.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{GestureError, Result};

// ── Landmark roles ─────────────────────────────────────────

/// The 21 fixed landmark roles, in detector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LandmarkRole {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexFingerMcp,
    IndexFingerPip,
    IndexFingerDip,
    IndexFingerTip,
    MiddleFingerMcp,
    MiddleFingerPip,
    MiddleFingerDip,
    MiddleFingerTip,
    RingFingerMcp,
    RingFingerPip,
    RingFingerDip,
    RingFingerTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

/// Total number of landmarks per hand.
pub const LANDMARK_COUNT: usize = 21;

impl LandmarkRole {
    /// All roles in index order.
    pub const ALL: [LandmarkRole; LANDMARK_COUNT] = [
        Self::Wrist,
        Self::ThumbCmc,
        Self::ThumbMcp,
        Self::ThumbIp,
        Self::ThumbTip,
        Self::IndexFingerMcp,
        Self::IndexFingerPip,
        Self::IndexFingerDip,
        Self::IndexFingerTip,
        Self::MiddleFingerMcp,
        Self::MiddleFingerPip,
        Self::MiddleFingerDip,
        Self::MiddleFingerTip,
        Self::RingFingerMcp,
        Self::RingFingerPip,
        Self::RingFingerDip,
        Self::RingFingerTip,
        Self::PinkyMcp,
        Self::PinkyPip,
        Self::PinkyDip,
        Self::PinkyTip,
    ];

    /// Convert role to array index (0-20).
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Role at a detector index, if any.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Detector-style name, e.g. `INDEX_FINGER_PIP`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wrist => "WRIST",
            Self::ThumbCmc => "THUMB_CMC",
            Self::ThumbMcp => "THUMB_MCP",
            Self::ThumbIp => "THUMB_IP",
            Self::ThumbTip => "THUMB_TIP",
            Self::IndexFingerMcp => "INDEX_FINGER_MCP",
            Self::IndexFingerPip => "INDEX_FINGER_PIP",
            Self::IndexFingerDip => "INDEX_FINGER_DIP",
            Self::IndexFingerTip => "INDEX_FINGER_TIP",
            Self::MiddleFingerMcp => "MIDDLE_FINGER_MCP",
            Self::MiddleFingerPip => "MIDDLE_FINGER_PIP",
            Self::MiddleFingerDip => "MIDDLE_FINGER_DIP",
            Self::MiddleFingerTip => "MIDDLE_FINGER_TIP",
            Self::RingFingerMcp => "RING_FINGER_MCP",
            Self::RingFingerPip => "RING_FINGER_PIP",
            Self::RingFingerDip => "RING_FINGER_DIP",
            Self::RingFingerTip => "RING_FINGER_TIP",
            Self::PinkyMcp => "PINKY_MCP",
            Self::PinkyPip => "PINKY_PIP",
            Self::PinkyDip => "PINKY_DIP",
            Self::PinkyTip => "PINKY_TIP",
        }
    }

    /// The four non-thumb fingertips.
    pub fn finger_tips() -> [LandmarkRole; 4] {
        [
            Self::IndexFingerTip,
            Self::MiddleFingerTip,
            Self::RingFingerTip,
            Self::PinkyTip,
        ]
    }

    /// The PIP joint of a non-thumb fingertip (two indices earlier).
    pub fn pip_of(tip: LandmarkRole) -> Option<LandmarkRole> {
        match tip {
            Self::IndexFingerTip => Some(Self::IndexFingerPip),
            Self::MiddleFingerTip => Some(Self::MiddleFingerPip),
            Self::RingFingerTip => Some(Self::RingFingerPip),
            Self::PinkyTip => Some(Self::PinkyPip),
            _ => None,
        }
    }
}

impl fmt::Display for LandmarkRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Handedness ─────────────────────────────────────────────

/// Detector-reported hand label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "Left",
            Self::Right => "Right",
        }
    }
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Handedness {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            _ => Err(format!("Unknown handedness: {}", s)),
        }
    }
}

impl<'de> Deserialize<'de> for Handedness {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ── Points ─────────────────────────────────────────────────

/// One normalized landmark position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "PointRepr")]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Accepts both `[x, y, z]` and `{"x": .., "y": .., "z": ..}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum PointRepr {
    Array([f64; 3]),
    Object {
        x: f64,
        y: f64,
        #[serde(default)]
        z: f64,
    },
}

impl From<PointRepr> for Point3 {
    fn from(repr: PointRepr) -> Self {
        match repr {
            PointRepr::Array([x, y, z]) => Point3 { x, y, z },
            PointRepr::Object { x, y, z } => Point3 { x, y, z },
        }
    }
}

impl Point3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance over x, y and z.
    pub fn distance(&self, other: &Point3) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Euclidean distance in the image plane (x, y only).
    pub fn planar_distance(&self, other: &Point3) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

// ── Landmark set ───────────────────────────────────────────

/// Landmarks of one detected hand, indexed by [`LandmarkRole`].
///
/// Normally holds exactly [`LANDMARK_COUNT`] points. Malformed detector
/// output may hold fewer; lookups of absent roles return `None`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet {
    points: Vec<Point3>,
}

impl LandmarkSet {
    pub fn new(points: Vec<Point3>) -> Self {
        Self { points }
    }

    /// Point for a role, or `None` if the detector did not supply it.
    pub fn get(&self, role: LandmarkRole) -> Option<&Point3> {
        self.points.get(role.index())
    }

    /// Point for a role, or [`GestureError::MissingLandmark`].
    pub fn require(&self, role: LandmarkRole) -> Result<&Point3> {
        self.get(role).ok_or(GestureError::MissingLandmark(role))
    }

    /// Number of points present.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether all 21 roles are present.
    pub fn is_complete(&self) -> bool {
        self.points.len() >= LANDMARK_COUNT
    }

    /// Errors with [`GestureError::IncompleteLandmarks`] unless complete.
    pub fn ensure_complete(&self) -> Result<()> {
        if self.is_complete() {
            Ok(())
        } else {
            Err(GestureError::IncompleteLandmarks {
                expected: LANDMARK_COUNT,
                found: self.points.len(),
            })
        }
    }

    /// Replace one point; grows the set with defaults if needed.
    pub fn set(&mut self, role: LandmarkRole, point: Point3) {
        let index = role.index();
        if self.points.len() <= index {
            self.points.resize(index + 1, Point3::default());
        }
        self.points[index] = point;
    }

    pub fn points(&self) -> &[Point3] {
        &self.points
    }
}

// ── Observations and frames ────────────────────────────────

/// One detected hand in one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandObservation {
    pub handedness: Handedness,
    pub landmarks: LandmarkSet,
}

impl HandObservation {
    pub fn new(handedness: Handedness, landmarks: LandmarkSet) -> Self {
        Self {
            handedness,
            landmarks,
        }
    }
}

/// Everything the detector reported for one video frame.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Frame {
    /// Capture time in milliseconds since the start of the stream, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<u64>,

    /// Zero, one or two hands
    #[serde(default)]
    pub hands: Vec<HandObservation>,
}

impl Frame {
    pub fn new(hands: Vec<HandObservation>) -> Self {
        Self {
            timestamp_ms: None,
            hands,
        }
    }

    /// A frame with no detected hands.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_timestamp_ms(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = Some(timestamp_ms);
        self
    }
}
