//! # Core: the shared context every worker runs against.
//!
//! Everything the workers share lives in one explicit bundle. [`Core`]
//! owns the request queue, the locked tables, the handler signals, the
//! display registry, the round-robin cursor, and the event sink, and
//! spawns the long-lived workers.
//!
//! ## Architecture
//! ```text
//! input loop ──submit()──► Ring ──► dispatcher
//!                                     │  writer lock: file record
//!                                     └─► signal by kind
//!                                           ├─► starter    ──► DisplayRegistry::place
//!                                           ├─► changer    ──► (place on group move)
//!                                           ├─► suspender
//!                                           ├─► canceller
//!                                           └─► viewer
//! display schedulers (one per group) tick against tables + rotation
//! ```
//!
//! ## Rules
//! - Workers communicate only through the tables, the signals, and the
//!   sink; no worker holds a reference to another worker.
//! - There is no shutdown channel; workers run until the process exits.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use chrono::Utc;

use crate::alarms::{AlarmRecord, Tables};
use crate::config::Config;
use crate::display::{DisplayRegistry, Rotation};
use crate::error::RuntimeError;
use crate::events::{Event, EventSink};
use crate::sync::{Ring, Signal, TableLock};

use super::{dispatcher, handlers};

/// One wake-up condition per handler.
pub struct Signals {
    pub start: Signal,
    pub change: Signal,
    pub suspend: Signal,
    pub remove: Signal,
    pub view: Signal,
}

impl Signals {
    fn new() -> Self {
        Self {
            start: Signal::new(),
            change: Signal::new(),
            suspend: Signal::new(),
            remove: Signal::new(),
            view: Signal::new(),
        }
    }
}

/// Shared state of the whole coordination core.
pub struct Core {
    /// Runtime tuning.
    pub cfg: Config,
    /// Bounded hand-off between the input loop and the dispatcher.
    pub queue: Ring<AlarmRecord>,
    /// Alarm list + change-request list behind the reader/writer lock.
    pub tables: TableLock<Tables>,
    /// Handler wake-up conditions.
    pub signals: Signals,
    /// Live display schedulers.
    pub displays: DisplayRegistry,
    /// Round-robin cursor across groups.
    pub rotation: Rotation,
    /// Destination for every log line.
    pub sink: Arc<dyn EventSink>,
}

impl Core {
    /// Builds a core around the given sink.
    pub fn new(cfg: Config, sink: Arc<dyn EventSink>) -> Arc<Self> {
        Arc::new(Self {
            queue: Ring::new(cfg.queue_capacity),
            cfg,
            tables: TableLock::new(Tables::new()),
            signals: Signals::new(),
            displays: DisplayRegistry::new(),
            rotation: Rotation::new(),
            sink,
        })
    }

    /// Formats and emits one event.
    pub fn emit(&self, event: Event) {
        self.sink.emit(&event);
    }

    /// Producer side of the queue: blocks while the ring is full, then logs
    /// the queue-entry line with the slot index that was used.
    pub fn submit(&self, record: AlarmRecord) {
        let kind = record.kind;
        let alarm_id = record.alarm_id;
        let time_stamp = record.time_stamp;
        let index = self.queue.push(record);
        self.emit(Event::QueueInserted {
            kind,
            alarm_id,
            at: Utc::now().timestamp(),
            time_stamp,
            index,
        });
    }

    /// Spawns the dispatcher and the five handlers. Display schedulers are
    /// spawned on demand by placement.
    pub fn spawn_workers(self: &Arc<Self>) -> Result<Vec<JoinHandle<()>>, RuntimeError> {
        let mut handles = Vec::new();

        handles.push(spawn_worker("dispatcher", {
            let core = Arc::clone(self);
            move || dispatcher::run(core, 1)
        })?);
        handles.push(spawn_worker("starter", {
            let core = Arc::clone(self);
            move || handlers::starter::run(core)
        })?);
        handles.push(spawn_worker("changer", {
            let core = Arc::clone(self);
            move || handlers::changer::run(core)
        })?);
        handles.push(spawn_worker("suspender", {
            let core = Arc::clone(self);
            move || handlers::suspender::run(core)
        })?);
        handles.push(spawn_worker("canceller", {
            let core = Arc::clone(self);
            move || handlers::canceller::run(core)
        })?);
        handles.push(spawn_worker("viewer", {
            let core = Arc::clone(self);
            move || handlers::viewer::run(core)
        })?);

        Ok(handles)
    }
}

fn spawn_worker(
    role: &'static str,
    body: impl FnOnce() + Send + 'static,
) -> Result<JoinHandle<()>, RuntimeError> {
    thread::Builder::new()
        .name(role.to_string())
        .spawn(body)
        .map_err(|source| RuntimeError::SpawnFailed { role, source })
}
