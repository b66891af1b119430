//! Consumers of the planner's event and log streams.

use anyhow::Result;

use crate::encode::PrimitiveEvent;

pub mod console;
pub mod keyboard;
#[cfg(windows)]
pub mod windows;

pub use console::ConsoleSink;
pub use keyboard::{KeyBindings, KeyDriver, KeyboardSink, TracingDriver};

/// Receives events in emission order. Events are pushed one at a time the
/// moment they are decided.
pub trait Sink {
    fn emit(&mut self, event: PrimitiveEvent) -> Result<()>;

    /// One human-readable line per navigation or attribute decision.
    fn log(&mut self, line: &str);

    /// Polled between whole attribute decisions, never inside a slider run.
    fn stop_requested(&self) -> bool {
        false
    }

    /// Called once after the last event of a completed run.
    fn complete(&mut self) {}
}

/// Keeps everything in memory.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub events: Vec<PrimitiveEvent>,
    pub log: Vec<String>,
    pub completed: bool,
    stop_after: Option<usize>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a stop once `count` events have been recorded.
    pub fn stop_after(count: usize) -> Self {
        Self { stop_after: Some(count), ..Self::default() }
    }
}

impl Sink for RecordingSink {
    fn emit(&mut self, event: PrimitiveEvent) -> Result<()> {
        self.events.push(event);
        Ok(())
    }

    fn log(&mut self, line: &str) {
        self.log.push(line.to_string());
    }

    fn stop_requested(&self) -> bool {
        self.stop_after.is_some_and(|limit| self.events.len() >= limit)
    }

    fn complete(&mut self) {
        self.completed = true;
    }
}
