//! Command sinks
//!
//! A sink performs (or records) the side effect of a command. Real OS
//! integrations (pointer injection, mixer, backlight) plug in behind
//! [`CommandSink`]; the sinks here cover recording, logging and stream
//! output.

#[cfg(test)]
use mockall::automock;
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;
use tracing::info;

use super::command::Command;
use crate::error::{GestureError, Result};

/// Destination for dispatched commands
#[cfg_attr(test, automock)]
pub trait CommandSink {
    /// Execute one command
    fn execute(&mut self, command: &Command) -> Result<()>;

    /// Flush buffered output
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<S: CommandSink + ?Sized> CommandSink for Box<S> {
    fn execute(&mut self, command: &Command) -> Result<()> {
        (**self).execute(command)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}

/// Keeps every command; clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    commands: Arc<Mutex<Vec<Command>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> Vec<Command> {
        self.commands.lock().clone()
    }

    pub fn clear(&self) {
        self.commands.lock().clear();
    }
}

impl CommandSink for RecordingSink {
    fn execute(&mut self, command: &Command) -> Result<()> {
        self.commands.lock().push(*command);
        Ok(())
    }
}

/// Logs each command at `info`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl CommandSink for TracingSink {
    fn execute(&mut self, command: &Command) -> Result<()> {
        info!(kind = command.kind(), "{}", command);
        Ok(())
    }
}

/// One JSON object per command per line
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> CommandSink for JsonLinesSink<W> {
    fn execute(&mut self, command: &Command) -> Result<()> {
        serde_json::to_writer(&mut self.writer, command)
            .map_err(|e| GestureError::sink("json", e.to_string()))?;
        self.writer
            .write_all(b"\n")
            .map_err(|e| GestureError::sink("json", e.to_string()))
    }

    fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| GestureError::sink("json", e.to_string()))
    }
}

/// Human-readable line per command
pub struct TextSink<W: Write> {
    writer: W,
}

impl<W: Write> TextSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> CommandSink for TextSink<W> {
    fn execute(&mut self, command: &Command) -> Result<()> {
        writeln!(self.writer, "→ {}", command).map_err(|e| GestureError::sink("text", e.to_string()))
    }

    fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| GestureError::sink("text", e.to_string()))
    }
}
