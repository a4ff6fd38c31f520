//! # air-gesture
//!
//! Hand-landmark gesture classification and control engine.
//!
//! An external hand tracker produces 21 normalized landmarks per detected
//! hand. This crate turns a stream of such frames into pointer, scroll,
//! volume, brightness, task-view and exit commands:
//! - [`gesture`] - geometric predicates and the prioritized gesture label
//! - [`control`] - cursor smoothing, click arming, palm cooldown, namaste exit
//! - [`dispatch`] - decisions to commands to sinks
//!
//! # Architecture
//!
//! ```text
//! JSON lines ─► FrameReader ─► GestureEngine ─────────────► Dispatcher ─► CommandSink
//!                               ├─> FrameGate (every Nth frame)
//!                               ├─> PoseSnapshot (predicates, label)
//!                               ├─> StateMachine + ControlState
//!                               └─> Command::from_decision (step sizes)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use air_gesture::{Config, Frame, GestureEngine};
//!
//! let config = Config::default();
//! let mut engine = GestureEngine::new(&config)?;
//! let report = engine.process_frame(&Frame::empty(), Duration::ZERO);
//! for command in &report.commands {
//!     println!("{}", command);
//! }
//! # Ok::<(), air_gesture::GestureError>(())
//! ```

#![warn(clippy::all)]

/// Configuration and threshold profiles
pub mod config;

/// Cross-frame control state machine
pub mod control;

/// Command model and delivery
pub mod dispatch;

/// Per-frame orchestration
pub mod engine;

/// Error types
pub mod error;

/// Predicates and classification
pub mod gesture;

/// Frame decoding and gating
pub mod ingest;

/// Landmark data model
pub mod landmark;

/// Metrics and user-facing error formatting
pub mod utils;

pub use config::{Config, ProfileSet, ThresholdProfile};
pub use control::{ControlState, Decision, StateMachine};
pub use dispatch::{Command, CommandSink, Dispatcher};
pub use engine::{FrameReport, GestureEngine, HandGesture};
pub use error::{GestureError, Result};
pub use gesture::{classify, GestureLabel, PoseSnapshot};
pub use ingest::{FrameClock, FrameGate, FrameReader, TimeBase};
pub use landmark::{Frame, HandObservation, Handedness, LandmarkRole, LandmarkSet, Point3};
