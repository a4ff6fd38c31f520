//! Temporal State Machine
//!
//! Turns per-frame poses into edge-triggered or continuous decisions,
//! threading an explicit [`ControlState`] through every update.
//!
//! # Right hand (pointer)
//!
//! ```text
//!            fingers apart (arms click)
//!   ┌────────┐ ────────────────────────► ┌─────────┐
//!   │ cursor │                           │  click  │ pinch / middle tap
//!   │ active │ ◄──────────────────────── │  mode   │ fires once, disarms
//!   └────────┘      fingers not apart    └─────────┘
//!   two fingers up: move cursor (every frame)
//! ```
//!
//! Pinky up/down nudges brightness on every qualifying frame.
//!
//! # Left hand (system)
//!
//! Together + two up scrolls up, together + fist scrolls down, an open
//! palm opens the task view (cooldown gated), index up raises volume and
//! every other pose lowers it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, trace};

use super::smoothing::smooth;
use super::state::ControlState;
use crate::config::{ScreenConfig, ThresholdProfile};
use crate::gesture::{namaste, PoseSnapshot};
use crate::landmark::{HandObservation, LandmarkRole, LandmarkSet};

/// Mouse button for click decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    Left,
    Right,
}

impl fmt::Display for MouseButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MouseButton::Left => f.write_str("left"),
            MouseButton::Right => f.write_str("right"),
        }
    }
}

/// Direction of a stepped adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn sign(&self) -> f64 {
        match self {
            Direction::Up => 1.0,
            Direction::Down => -1.0,
        }
    }
}

/// State machine output, before step sizes are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Absolute pixel position
    MoveCursor { x: u32, y: u32 },
    Click(MouseButton),
    Scroll(Direction),
    Volume(Direction),
    Brightness(Direction),
    TaskView,
    Exit,
}

/// Per-frame update rules for both hand roles.
#[derive(Debug, Clone, Copy)]
pub struct StateMachine {
    screen: ScreenConfig,
}

impl StateMachine {
    pub fn new(screen: ScreenConfig) -> Self {
        Self { screen }
    }

    pub fn screen(&self) -> ScreenConfig {
        self.screen
    }

    /// Right-hand update: cursor, clicks, brightness
    pub fn update_right(
        &self,
        state: &mut ControlState,
        hand: &LandmarkSet,
        pose: &PoseSnapshot,
        profile: &ThresholdProfile,
        out: &mut Vec<Decision>,
    ) {
        if pose.fingers_apart {
            // Arm only on the transition into apart.
            if state.cursor_active {
                state.click_ready = true;
            }
            state.cursor_active = false;
        } else {
            state.cursor_active = true;
            state.click_ready = false;
        }

        if state.cursor_active && pose.two_fingers_up {
            if let Some(decision) = self.move_cursor(state, hand, profile.cursor_smoothing) {
                out.push(decision);
            }
        }

        if !state.cursor_active && state.click_ready {
            if pose.pinch {
                debug!("Left click");
                out.push(Decision::Click(MouseButton::Left));
                state.click_ready = false;
            } else if pose.middle_thumb_tap {
                debug!("Right click");
                out.push(Decision::Click(MouseButton::Right));
                state.click_ready = false;
            }
        }

        if pose.pinky_up {
            out.push(Decision::Brightness(Direction::Up));
        }
        if pose.pinky_down {
            out.push(Decision::Brightness(Direction::Down));
        }
    }

    fn move_cursor(
        &self,
        state: &mut ControlState,
        hand: &LandmarkSet,
        alpha: f64,
    ) -> Option<Decision> {
        let tip = hand.get(LandmarkRole::IndexFingerTip)?;
        let raw_x = (tip.x * self.screen.width as f64).trunc();
        let raw_y = (tip.y * self.screen.height as f64).trunc();

        let x = smooth(raw_x, state.smoothed_cursor_x, alpha);
        let y = smooth(raw_y, state.smoothed_cursor_y, alpha);
        state.smoothed_cursor_x = Some(x);
        state.smoothed_cursor_y = Some(y);

        let x = clamp_pixel(x, self.screen.width);
        let y = clamp_pixel(y, self.screen.height);
        trace!(raw_x, raw_y, x, y, "Cursor target");
        Some(Decision::MoveCursor { x, y })
    }

    /// Left-hand update: scroll, task view, volume
    pub fn update_left(
        &self,
        state: &mut ControlState,
        pose: &PoseSnapshot,
        profile: &ThresholdProfile,
        now: Duration,
        out: &mut Vec<Decision>,
    ) {
        if pose.index_middle_together && pose.two_fingers_up {
            out.push(Decision::Scroll(Direction::Up));
        }
        if pose.index_middle_together && pose.five_fingers_down {
            out.push(Decision::Scroll(Direction::Down));
        }

        if pose.five_fingers_up
            && state.palm_cooldown_elapsed(now, profile.palm_open_cooldown())
        {
            debug!(?now, "Palm open, triggering task view");
            out.push(Decision::TaskView);
            state.last_palm_open_time = Some(now);
        }

        // Any pose other than index up lowers the volume.
        if pose.index_up {
            out.push(Decision::Volume(Direction::Up));
        } else {
            out.push(Decision::Volume(Direction::Down));
        }
    }

    /// Two-hand exit check over exactly two complete observations
    pub fn check_namaste(
        &self,
        hands: &[&HandObservation],
        profile: &ThresholdProfile,
    ) -> Option<Decision> {
        match hands {
            [a, b] if namaste(a, b, profile) => {
                debug!("Namaste detected");
                Some(Decision::Exit)
            }
            _ => None,
        }
    }
}

fn clamp_pixel(value: f64, extent: u32) -> u32 {
    let max = extent.saturating_sub(1) as f64;
    value.trunc().clamp(0.0, max) as u32
}
