//! Temporal Control
//!
//! Stateful side of gesture handling: cursor smoothing, click arming and
//! the task-view cooldown. All mutable state lives in [`ControlState`] and
//! is passed explicitly to [`StateMachine`] on every frame.

pub mod machine;
pub mod smoothing;
pub mod state;

pub use machine::{Decision, Direction, MouseButton, StateMachine};
pub use smoothing::smooth;
pub use state::ControlState;
