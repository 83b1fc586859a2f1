//! Writer-preferring reader/writer lock over the shared alarm data.
//!
//! Not a plain `std::sync::RwLock`; the discipline here is deliberate:
//!
//! - Writers hold `write_sem` exclusively for the whole mutation.
//! - The **first** reader of an epoch acquires `write_sem` and the **last**
//!   reader releases it, so no writer can enter while any reader is active.
//! - Readers additionally serialize their inner traversal through the data
//!   mutex. Two readers never overlap a traversal; this keeps traversal
//!   cheap and rules out reentrancy.
//!
//! ## Rules
//! - A writer that holds the epoch sees a zero reader count, so every
//!   arriving reader becomes "first" and parks on `write_sem`.
//! - Guards release in reverse acquisition order via `Drop`.
//! - This lock is level 1 of the global lock order; nothing else may be
//!   held when acquiring it.

use std::ops::{Deref, DerefMut};
use std::sync::{Mutex, MutexGuard};

use super::semaphore::Semaphore;

/// Reader/writer-locked container for the alarm lists.
pub struct TableLock<T> {
    write_sem: Semaphore,
    readers: Mutex<usize>,
    data: Mutex<T>,
}

impl<T> TableLock<T> {
    pub fn new(value: T) -> Self {
        Self {
            write_sem: Semaphore::new(1),
            readers: Mutex::new(0),
            data: Mutex::new(value),
        }
    }

    /// Enters the read epoch and takes the traversal lock.
    pub fn read(&self) -> ReadGuard<'_, T> {
        {
            let mut readers = self.readers.lock().expect("reader count poisoned");
            *readers += 1;
            if *readers == 1 {
                self.write_sem.acquire();
            }
        }
        let inner = self.data.lock().expect("table data poisoned");
        ReadGuard { lock: self, inner }
    }

    /// Takes the lock exclusively for mutation.
    pub fn write(&self) -> WriteGuard<'_, T> {
        self.write_sem.acquire();
        let inner = self.data.lock().expect("table data poisoned");
        WriteGuard { lock: self, inner }
    }
}

/// Shared-access guard; serialized traversal within a shared epoch.
pub struct ReadGuard<'a, T> {
    lock: &'a TableLock<T>,
    inner: MutexGuard<'a, T>,
}

impl<T> Deref for ReadGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T> Drop for ReadGuard<'_, T> {
    fn drop(&mut self) {
        let mut readers = self.lock.readers.lock().expect("reader count poisoned");
        *readers -= 1;
        if *readers == 0 {
            self.lock.write_sem.release();
        }
    }
}

/// Exclusive-access guard.
pub struct WriteGuard<'a, T> {
    lock: &'a TableLock<T>,
    inner: MutexGuard<'a, T>,
}

impl<T> Deref for WriteGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T> DerefMut for WriteGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.inner
    }
}

impl<T> Drop for WriteGuard<'_, T> {
    fn drop(&mut self) {
        self.lock.write_sem.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn writers_are_mutually_exclusive() {
        let lock = Arc::new(TableLock::new(0u64));
        let mut handles = Vec::new();
        for _ in 0..4 {
            let lock = Arc::clone(&lock);
            handles.push(thread::spawn(move || {
                for _ in 0..1000 {
                    let mut guard = lock.write();
                    *guard += 1;
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(*lock.read(), 4000);
    }

    #[test]
    fn read_epoch_blocks_writer() {
        let lock = Arc::new(TableLock::new(7u32));
        let guard = lock.read();

        let writer = {
            let lock = Arc::clone(&lock);
            thread::spawn(move || {
                *lock.write() = 8;
            })
        };
        thread::sleep(Duration::from_millis(50));
        assert!(!writer.is_finished());
        assert_eq!(*guard, 7);

        drop(guard);
        writer.join().unwrap();
        assert_eq!(*lock.read(), 8);
    }

    #[test]
    fn writer_blocks_readers() {
        let lock = Arc::new(TableLock::new(1u32));
        let guard = lock.write();

        let reader = {
            let lock = Arc::clone(&lock);
            thread::spawn(move || *lock.read())
        };
        thread::sleep(Duration::from_millis(50));
        assert!(!reader.is_finished());

        drop(guard);
        assert_eq!(reader.join().unwrap(), 1);
    }
}
