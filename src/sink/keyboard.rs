//! Live sink: turns primitive events into timed key presses.

use anyhow::Result;
use indicatif::ProgressBar;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use super::Sink;
use crate::encode::{PrimitiveEvent, PrimitiveKind};

/// Hardware scan code per primitive (set 1, as DirectInput reads them).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub increase: u16,
    pub decrease: u16,
    pub confirm: u16,
    pub toggle: u16,
    pub cancel: u16,
    pub next_page: u16,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            increase: 0x20,  // D
            decrease: 0x1E,  // A
            confirm: 0x1F,   // S
            toggle: 0x39,    // Space
            cancel: 0x01,    // Esc
            next_page: 0x12, // E
        }
    }
}

impl KeyBindings {
    pub fn scan_code(&self, kind: PrimitiveKind) -> u16 {
        match kind {
            PrimitiveKind::Increase => self.increase,
            PrimitiveKind::Decrease => self.decrease,
            PrimitiveKind::Confirm => self.confirm,
            PrimitiveKind::Toggle => self.toggle,
            PrimitiveKind::Cancel => self.cancel,
            PrimitiveKind::NextPage => self.next_page,
        }
    }
}

/// Platform hook for focusing the editor and sending raw key transitions.
pub trait KeyDriver {
    fn focus(&mut self, window_title: &str) -> Result<()>;
    fn key_down(&mut self, scan_code: u16) -> Result<()>;
    fn key_up(&mut self, scan_code: u16) -> Result<()>;
}

/// Driver for platforms without input injection: records transitions in the trace log.
#[derive(Debug, Default)]
pub struct TracingDriver {
    pub transitions: usize,
}

impl KeyDriver for TracingDriver {
    fn focus(&mut self, window_title: &str) -> Result<()> {
        tracing::warn!("No input driver on this platform; '{}' will not receive keys", window_title);
        Ok(())
    }

    fn key_down(&mut self, scan_code: u16) -> Result<()> {
        self.transitions += 1;
        tracing::trace!("key down {:#04x}", scan_code);
        Ok(())
    }

    fn key_up(&mut self, scan_code: u16) -> Result<()> {
        self.transitions += 1;
        tracing::trace!("key up {:#04x}", scan_code);
        Ok(())
    }
}

pub struct KeyboardSink<D: KeyDriver> {
    driver: D,
    bindings: KeyBindings,
    stop: Arc<AtomicBool>,
    progress: Option<ProgressBar>,
}

impl<D: KeyDriver> KeyboardSink<D> {
    pub fn new(driver: D, bindings: KeyBindings) -> Self {
        Self { driver, bindings, stop: Arc::new(AtomicBool::new(false)), progress: None }
    }

    /// Share a flag that, once set, stops the run at the next decision boundary.
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = stop;
        self
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }
}

impl<D: KeyDriver> Sink for KeyboardSink<D> {
    fn emit(&mut self, event: PrimitiveEvent) -> Result<()> {
        let code = self.bindings.scan_code(event.kind);
        let pause = Duration::from_millis(event.delay_ms);

        self.driver.key_down(code)?;
        thread::sleep(pause);
        self.driver.key_up(code)?;
        thread::sleep(pause);

        if let Some(pb) = &self.progress {
            pb.tick();
        }
        Ok(())
    }

    fn log(&mut self, line: &str) {
        tracing::info!("{}", line);
        match &self.progress {
            Some(pb) => pb.set_message(line.to_string()),
            None => println!("{}", line),
        }
    }

    fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    fn complete(&mut self) {
        if let Some(pb) = &self.progress {
            pb.finish_with_message("Reconciliation complete!");
        }
    }
}
