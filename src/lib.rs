//! # chime
//!
//! **Chime** is a multi-threaded console alarm manager: users type
//! commands, background workers keep every active alarm's message printing
//! on its interval, and display schedulers take turns across alarm groups
//! in strict round-robin order.
//!
//! ## Features
//!
//! | Area             | Description                                                        | Key types                           |
//! |------------------|--------------------------------------------------------------------|-------------------------------------|
//! | **Requests**     | Parse console commands into queueable request records.             | [`parse_command`], [`AlarmRecord`]  |
//! | **Coordination** | Bounded hand-off queue, reader/writer table lock, handler signals. | [`Core`], [`sync::Ring`], [`sync::TableLock`] |
//! | **Handlers**     | Start, change, suspend/reactivate, cancel, and view workers.       | [`Core::spawn_workers`]             |
//! | **Display**      | Per-group schedulers (≤2 alarms each) with round-robin printing.   | [`DisplayRegistry`], [`Rotation`]   |
//! | **Events**       | Typed log-line catalogue delivered to pluggable sinks.             | [`Event`], [`EventSink`], [`MemorySink`] |
//! | **Console**      | Raw-mode prompt that survives asynchronous output.                 | [`Console`]                         |
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use chime::{parse_command, Config, Core, MemorySink};
//!
//! let cfg = Config::default();
//! let sink = Arc::new(MemorySink::new());
//! let core = Core::new(cfg.clone(), sink.clone());
//! core.spawn_workers().expect("worker threads");
//!
//! let request = parse_command("Start_Alarm(1): Group(10) 2 60 hello", cfg.message_limit)
//!     .expect("valid command");
//! core.submit(request);
//! // "Alarm (1) Printed by Alarm Display Thread 1 …" lines show up in the
//! // sink once the display scheduler's first tick comes around.
//! ```

mod alarms;
mod config;
mod console;
mod dispatch;
mod display;
mod error;
mod events;
mod input;

pub mod sync;

// ---- Public re-exports ----

pub use alarms::{AlarmList, AlarmRecord, AlarmState, AlarmStatus, RecordKey, RequestKind, Tables};
pub use config::Config;
pub use console::{Console, PROMPT};
pub use dispatch::{Core, Signals};
pub use display::{DisplayRegistry, Rotation, SLOTS_PER_SCHEDULER};
pub use error::{ParseError, RuntimeError};
pub use events::{AlarmInfo, DisplayNotice, Event, EventSink, MemorySink};
pub use input::parse_command;
