//! Action Dispatcher
//!
//! Delivers commands to a [`CommandSink`] in frame order. A failing sink
//! never stops delivery: the failure is logged, counted and the next
//! command is tried.
//!
//! # Architecture
//!
//! ```text
//! Decision ──► Command::from_decision ──► Dispatcher ──► CommandSink
//!                (step sizes)                 │           ├─ LevelSink ─► LevelControl
//!                                             │           ├─ JsonLinesSink
//!                                             ▼           ├─ TextSink
//!                                       DispatchReport    └─ TracingSink
//! ```

pub mod command;
pub mod levels;
pub mod sink;

use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{recovery_action, Result};
use crate::utils::{metric_names, MetricsCollector};

pub use command::Command;
pub use levels::{LevelAdjuster, LevelControl, LevelSink, SimulatedLevels};
pub use sink::{CommandSink, JsonLinesSink, RecordingSink, TextSink, TracingSink};

/// Outcome of one dispatch call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub delivered: usize,
    pub failed: usize,
}

pub struct Dispatcher {
    sink: Box<dyn CommandSink + Send>,
    metrics: Arc<MetricsCollector>,
}

impl Dispatcher {
    pub fn new(sink: Box<dyn CommandSink + Send>, metrics: Arc<MetricsCollector>) -> Self {
        Self { sink, metrics }
    }

    /// Deliver commands in order
    pub fn dispatch(&mut self, commands: &[Command]) -> DispatchReport {
        let mut report = DispatchReport::default();
        for command in commands {
            match self.sink.execute(command) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    warn!(
                        command = command.kind(),
                        action = ?recovery_action(&e),
                        "Sink failed: {}",
                        e
                    );
                    self.metrics.increment_counter(metric_names::SINK_FAILURES, 1);
                    report.failed += 1;
                }
            }
        }
        if !commands.is_empty() {
            debug!(
                delivered = report.delivered,
                failed = report.failed,
                "Dispatched commands"
            );
        }
        report
    }

    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush()
    }
}
