//! Counting semaphore built from a mutex and a condition variable.
//!
//! The reader/writer discipline in [`super::rw`] is assembled from these.
//! Waiters re-check the count after every wake-up (Mesa semantics), so
//! spurious wake-ups are harmless.

use std::sync::{Condvar, Mutex};

/// Counting semaphore with blocking acquire.
pub struct Semaphore {
    permits: Mutex<usize>,
    available: Condvar,
}

impl Semaphore {
    /// Creates a semaphore holding `permits` permits.
    pub fn new(permits: usize) -> Self {
        Self {
            permits: Mutex::new(permits),
            available: Condvar::new(),
        }
    }

    /// Blocks until a permit is available, then takes it.
    pub fn acquire(&self) {
        let mut permits = self.permits.lock().expect("semaphore mutex poisoned");
        while *permits == 0 {
            permits = self
                .available
                .wait(permits)
                .expect("semaphore mutex poisoned");
        }
        *permits -= 1;
    }

    /// Returns a permit and wakes one waiter.
    pub fn release(&self) {
        let mut permits = self.permits.lock().expect("semaphore mutex poisoned");
        *permits += 1;
        self.available.notify_one();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn acquire_consumes_permits() {
        let sem = Semaphore::new(2);
        sem.acquire();
        sem.acquire();
        sem.release();
        sem.acquire();
    }

    #[test]
    fn acquire_blocks_until_release() {
        let sem = Arc::new(Semaphore::new(0));
        let waiter = {
            let sem = Arc::clone(&sem);
            thread::spawn(move || {
                sem.acquire();
            })
        };
        thread::sleep(Duration::from_millis(50));
        assert!(!waiter.is_finished());
        sem.release();
        waiter.join().unwrap();
    }

    #[test]
    fn release_wakes_one_waiter_at_a_time() {
        let sem = Arc::new(Semaphore::new(0));
        let waiters: Vec<_> = (0..3)
            .map(|_| {
                let sem = Arc::clone(&sem);
                thread::spawn(move || sem.acquire())
            })
            .collect();
        for _ in 0..3 {
            sem.release();
        }
        for w in waiters {
            w.join().unwrap();
        }
    }
}
