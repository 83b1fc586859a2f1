//! Generation-counter condition for handler wake-ups.
//!
//! The dispatcher signals a handler after inserting a request, but the
//! handler's predicate (a matching record in the table) lives behind the
//! table lock, not behind the condition's mutex. A naive check-then-wait
//! loses any signal that lands in between. The generation counter closes
//! the gap:
//!
//! ```text
//! handler:                       dispatcher:
//!   seen = signal.epoch()
//!   claim work (none found)        insert record
//!                                  signal.notify()   // epoch += 1
//!   signal.wait_past(seen)         // returns immediately: epoch > seen
//! ```
//!
//! Waiters still re-check their predicate after waking (Mesa semantics);
//! the counter only guarantees the wake-up is never lost.

use std::sync::{Condvar, Mutex};

/// Condition variable with a monotonic generation counter.
pub struct Signal {
    epoch: Mutex<u64>,
    cond: Condvar,
}

impl Signal {
    pub fn new() -> Self {
        Self {
            epoch: Mutex::new(0),
            cond: Condvar::new(),
        }
    }

    /// Current generation; snapshot this before checking the predicate.
    pub fn epoch(&self) -> u64 {
        *self.epoch.lock().expect("signal mutex poisoned")
    }

    /// Advances the generation and wakes one waiter.
    pub fn notify(&self) {
        let mut epoch = self.epoch.lock().expect("signal mutex poisoned");
        *epoch += 1;
        self.cond.notify_one();
    }

    /// Blocks until the generation advances past `seen`.
    pub fn wait_past(&self, seen: u64) {
        let mut epoch = self.epoch.lock().expect("signal mutex poisoned");
        while *epoch <= seen {
            epoch = self.cond.wait(epoch).expect("signal mutex poisoned");
        }
    }
}

impl Default for Signal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn notify_before_wait_is_not_lost() {
        let sig = Signal::new();
        let seen = sig.epoch();
        sig.notify();
        // Must return immediately even though the notify preceded the wait.
        sig.wait_past(seen);
    }

    #[test]
    fn wait_blocks_until_notified() {
        let sig = Arc::new(Signal::new());
        let seen = sig.epoch();
        let waiter = {
            let sig = Arc::clone(&sig);
            thread::spawn(move || sig.wait_past(seen))
        };
        thread::sleep(Duration::from_millis(50));
        assert!(!waiter.is_finished());
        sig.notify();
        waiter.join().unwrap();
    }
}
