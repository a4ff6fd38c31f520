//! Control State
//!
//! The only mutable state carried between frames. One value per engine
//! instance (not per hand), threaded explicitly through each update.

use std::time::Duration;

/// Cross-frame control state
#[derive(Debug, Clone, PartialEq)]
pub struct ControlState {
    /// Smoothed cursor x in pixels; `None` until the first cursor move
    pub smoothed_cursor_x: Option<f64>,

    /// Smoothed cursor y in pixels; `None` until the first cursor move
    pub smoothed_cursor_y: Option<f64>,

    /// False while the right hand holds index and middle apart
    pub cursor_active: bool,

    /// Armed on entering fingers-apart, consumed by one click
    pub click_ready: bool,

    /// Time of the last task-view trigger; `None` is minus infinity
    pub last_palm_open_time: Option<Duration>,
}

impl ControlState {
    pub fn new() -> Self {
        Self {
            smoothed_cursor_x: None,
            smoothed_cursor_y: None,
            cursor_active: true,
            click_ready: false,
            last_palm_open_time: None,
        }
    }

    /// Return to the initial values
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Smoothed cursor position, once both axes are known
    pub fn smoothed_cursor(&self) -> Option<(f64, f64)> {
        self.smoothed_cursor_x.zip(self.smoothed_cursor_y)
    }

    /// Strictly more than `cooldown` has passed since the last task-view trigger
    pub fn palm_cooldown_elapsed(&self, now: Duration, cooldown: Duration) -> bool {
        match self.last_palm_open_time {
            None => true,
            Some(last) => now.saturating_sub(last) > cooldown,
        }
    }
}

impl Default for ControlState {
    fn default() -> Self {
        Self::new()
    }
}
