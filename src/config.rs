//! # Global runtime configuration.
//!
//! [`Config`] defines the core's tuning: request-queue capacity, display
//! tick period, and the message length cap applied by the parser.
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use chime::Config;
//!
//! let mut cfg = Config::default();
//! cfg.queue_capacity = 8;
//! cfg.tick = Duration::from_millis(250);
//!
//! assert_eq!(cfg.message_limit, 127);
//! ```

use std::time::Duration;

/// Tuning knobs shared by every worker.
#[derive(Clone, Debug)]
pub struct Config {
    /// Capacity of the request ring buffer between the input loop and the
    /// dispatcher.
    pub queue_capacity: usize,
    /// Period of the display scheduler loop.
    pub tick: Duration,
    /// Maximum message payload in bytes after trimming.
    pub message_limit: usize,
}

impl Default for Config {
    /// Provides the shipped defaults:
    /// - `queue_capacity = 4`
    /// - `tick = 1s`
    /// - `message_limit = 127`
    fn default() -> Self {
        Self {
            queue_capacity: 4,
            tick: Duration::from_secs(1),
            message_limit: 127,
        }
    }
}
