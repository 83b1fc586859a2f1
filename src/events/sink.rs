//! Event sinks.
//!
//! Workers never print; they emit [`Event`]s to whatever sink the core was
//! built with. The binary wires in the console, tests wire in a
//! [`MemorySink`] and assert on the recorded lines.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use super::event::Event;

/// Destination for formatted log lines.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &Event);
}

/// Sink that records formatted lines in memory.
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of everything recorded so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("memory sink poisoned").clone()
    }

    /// Lines containing `needle`, in emission order.
    pub fn matching(&self, needle: &str) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|l| l.contains(needle))
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        !self.matching(needle).is_empty()
    }

    /// Polls until a line containing `needle` shows up or `timeout` passes.
    pub fn wait_for(&self, needle: &str, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if self.contains(needle) {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            std::thread::sleep(Duration::from_millis(20));
        }
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: &Event) {
        self.lines
            .lock()
            .expect("memory sink poisoned")
            .push(event.to_string());
    }
}
