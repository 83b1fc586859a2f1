//! # Error types used by the alarm runtime.
//!
//! This module defines two main error enums:
//!
//! - [`ParseError`] errors raised while parsing console commands.
//! - [`RuntimeError`] errors raised by the runtime itself.
//!
//! Both types provide an `as_label` helper returning a short stable label
//! for logs.

use std::io;

use thiserror::Error;

/// # Errors produced while parsing a console command.
///
/// Handlers never see these; a command that fails to parse is reported on
/// the console and discarded before it reaches the request queue.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ParseError {
    /// A numeric field (id, group, interval, time) was zero or malformed.
    #[error("Invalid parameters (IDs, interval, or time must be positive)")]
    InvalidParameters,

    /// The line matched none of the command forms.
    #[error("Unrecognized command format")]
    UnrecognizedFormat,
}

impl ParseError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ParseError::InvalidParameters => "parse_invalid_parameters",
            ParseError::UnrecognizedFormat => "parse_unrecognized_format",
        }
    }
}

/// # Errors produced by the runtime itself.
///
/// These are unrecoverable setup failures: the coordination core cannot
/// partially unwind shared state, so the binary reports them and exits.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// An OS thread could not be spawned.
    #[error("failed to spawn {role} thread: {source}")]
    SpawnFailed {
        /// Which worker failed to start.
        role: &'static str,
        #[source]
        source: io::Error,
    },

    /// The console could not be initialized or written to.
    #[error("console failure: {0}")]
    Console(#[from] io::Error),
}

impl RuntimeError {
    /// Returns a short stable label.
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::SpawnFailed { .. } => "runtime_spawn_failed",
            RuntimeError::Console(_) => "runtime_console",
        }
    }
}
