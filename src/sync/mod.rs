//! Thread-coordination primitives.
//!
//! Everything here is built from `std::sync` mutexes and condition
//! variables; there is no async runtime anywhere in the crate. The lock
//! order across the system is:
//!
//! 1. [`TableLock`] (reader or writer side)
//! 2. display-list mutex
//! 3. per-scheduler mutex
//! 4. round-robin cursor mutex
//! 5. [`Ring`] mutex (leaf)
//!
//! Locks are acquired only in this order and released in reverse.

mod ring;
mod rw;
mod semaphore;
mod signal;

pub use ring::Ring;
pub use rw::{ReadGuard, TableLock, WriteGuard};
pub use semaphore::Semaphore;
pub use signal::Signal;
