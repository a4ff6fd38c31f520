//! Gesture Recognition
//!
//! Stateless, per-frame interpretation of hand landmarks:
//!
//! - [`predicates`]: geometric booleans (finger extension, tip distances)
//! - [`classifier`]: one prioritized [`GestureLabel`] per hand
//!
//! Nothing in this module keeps state between frames; see
//! [`crate::control`] for the temporal side.

pub mod classifier;
pub mod predicates;

#[cfg(test)]
pub(crate) mod fixtures;

pub use classifier::{classify, GestureLabel, PoseSnapshot};
pub use predicates::namaste;
