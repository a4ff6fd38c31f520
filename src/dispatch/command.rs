//! Output commands
//!
//! Each state-machine [`Decision`] maps to exactly one [`Command`], with the
//! configured step sizes applied. Commands carry everything a sink needs:
//! absolute pixels for cursor moves, signed steps for scroll, volume and
//! brightness, and no payload for task view or exit.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ControlConfig;
use crate::control::{Decision, MouseButton};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    MoveCursor { x: u32, y: u32 },
    Click { button: MouseButton },
    /// Positive scrolls up
    Scroll { amount: f64 },
    /// Signed change in the 0.0-1.0 volume range
    AdjustVolume { delta: f64 },
    /// Signed change in the 0-100 brightness range
    AdjustBrightness { delta: i32 },
    TriggerTaskView,
    RequestExit,
}

impl Command {
    pub fn from_decision(decision: Decision, steps: &ControlConfig) -> Self {
        match decision {
            Decision::MoveCursor { x, y } => Command::MoveCursor { x, y },
            Decision::Click(button) => Command::Click { button },
            Decision::Scroll(dir) => Command::Scroll {
                amount: dir.sign() * steps.scroll_step,
            },
            Decision::Volume(dir) => Command::AdjustVolume {
                delta: dir.sign() * steps.volume_step,
            },
            Decision::Brightness(dir) => Command::AdjustBrightness {
                delta: dir.sign() as i32 * steps.brightness_step,
            },
            Decision::TaskView => Command::TriggerTaskView,
            Decision::Exit => Command::RequestExit,
        }
    }

    /// Short kind name used for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Command::MoveCursor { .. } => "move_cursor",
            Command::Click { .. } => "click",
            Command::Scroll { .. } => "scroll",
            Command::AdjustVolume { .. } => "adjust_volume",
            Command::AdjustBrightness { .. } => "adjust_brightness",
            Command::TriggerTaskView => "trigger_task_view",
            Command::RequestExit => "request_exit",
        }
    }

    pub fn is_exit(&self) -> bool {
        matches!(self, Command::RequestExit)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::MoveCursor { x, y } => write!(f, "move cursor to ({}, {})", x, y),
            Command::Click { button } => write!(f, "{} click", button),
            Command::Scroll { amount } => write!(f, "scroll {:+}", amount),
            Command::AdjustVolume { delta } => write!(f, "volume {:+.2}", delta),
            Command::AdjustBrightness { delta } => write!(f, "brightness {:+}", delta),
            Command::TriggerTaskView => f.write_str("task view"),
            Command::RequestExit => f.write_str("exit"),
        }
    }
}
