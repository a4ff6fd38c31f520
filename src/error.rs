//! Gesture Engine Error Types
//!
//! Errors raised while reading landmarks, selecting profiles and driving
//! command sinks. Nearly all of them are recovered locally: the frame loop
//! only ever stops on an unrecoverable ingestion I/O failure.

use thiserror::Error;

use crate::landmark::LandmarkRole;

/// Result type for gesture engine operations
pub type Result<T> = std::result::Result<T, GestureError>;

/// Gesture engine error types
#[derive(Error, Debug)]
pub enum GestureError {
    /// A landmark role was requested that the observation does not carry
    #[error("Missing landmark: {0}")]
    MissingLandmark(LandmarkRole),

    /// The detector produced fewer landmarks than a full hand has
    #[error("Incomplete landmark set: expected {expected}, found {found}")]
    IncompleteLandmarks {
        /// Landmarks in a complete hand
        expected: usize,
        /// Landmarks actually present
        found: usize,
    },

    /// Profile name not present in the registry
    #[error("Unknown profile: {0}")]
    UnknownProfile(String),

    /// Profile values out of range
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    /// An output sink (cursor, volume, brightness, ...) failed
    #[error("Sink '{sink}' failed: {reason}")]
    SinkFailure {
        /// Sink name
        sink: String,
        /// Failure description
        reason: String,
    },

    /// A frame line could not be decoded
    #[error("Frame decode error: {0}")]
    FrameDecode(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GestureError {
    /// Shorthand for building a [`GestureError::SinkFailure`]
    pub fn sink(sink: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SinkFailure {
            sink: sink.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for GestureError {
    fn from(err: serde_json::Error) -> Self {
        Self::FrameDecode(err.to_string())
    }
}

/// Error classification for recovery strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// Malformed hand observation
    Input,
    /// Profile selection or validation
    Profile,
    /// Output sink failures
    Sink,
    /// Frame decoding
    Ingest,
    /// Underlying I/O
    Io,
}

/// Classify error for recovery strategy selection
pub fn classify_error(error: &GestureError) -> ErrorType {
    match error {
        GestureError::MissingLandmark(_) | GestureError::IncompleteLandmarks { .. } => {
            ErrorType::Input
        }
        GestureError::UnknownProfile(_) | GestureError::InvalidProfile(_) => ErrorType::Profile,
        GestureError::SinkFailure { .. } => ErrorType::Sink,
        GestureError::FrameDecode(_) => ErrorType::Ingest,
        GestureError::Io(_) => ErrorType::Io,
    }
}

/// Recovery action to take after error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Skip this hand for the current frame
    SkipHand,

    /// Drop the whole frame
    SkipFrame,

    /// Keep the last known sink value and continue
    RetainStale,

    /// Leave the active profile in place
    KeepActiveProfile,

    /// Fail and propagate error
    Fail,
}

/// Determine recovery action for error
pub fn recovery_action(error: &GestureError) -> RecoveryAction {
    match classify_error(error) {
        ErrorType::Input => RecoveryAction::SkipHand,
        ErrorType::Profile => RecoveryAction::KeepActiveProfile,
        ErrorType::Sink => RecoveryAction::RetainStale,
        ErrorType::Ingest => RecoveryAction::SkipFrame,
        ErrorType::Io => RecoveryAction::Fail,
    }
}
