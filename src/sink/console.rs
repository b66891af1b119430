//! Dry-run sink that prints instead of pressing keys.

use anyhow::Result;
use console::style;
use std::io::Write;

use super::Sink;
use crate::encode::PrimitiveEvent;

pub struct ConsoleSink<W: Write> {
    out: W,
    events: usize,
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, events: 0 }
    }

    pub fn event_count(&self) -> usize {
        self.events
    }
}

impl<W: Write> Sink for ConsoleSink<W> {
    fn emit(&mut self, event: PrimitiveEvent) -> Result<()> {
        self.events += 1;
        writeln!(self.out, "  {} ({}ms)", style(event.kind).cyan(), event.delay_ms)?;
        Ok(())
    }

    fn log(&mut self, line: &str) {
        // Log lines are best-effort; a closed pipe should not abort the plan.
        let _ = writeln!(self.out, "{}", style(line).bold());
    }

    fn complete(&mut self) {
        let _ = writeln!(self.out, "{} events", self.events);
    }
}
