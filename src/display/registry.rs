//! Registry of live display schedulers.
//!
//! The starter (and the changer, after a group move) places alarms through
//! [`DisplayRegistry::place`]: first scheduler of the group with a free
//! slot wins, otherwise a new scheduler thread is created. Schedulers
//! remove themselves through [`DisplayRegistry::retire`] before exiting,
//! so a later placement for the same group always finds a live worker.
//!
//! The registry mutex is level 2 of the lock order; callers hold no table
//! lock when placing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use chrono::Utc;

use crate::alarms::RecordKey;
use crate::dispatch::Core;
use crate::events::Event;

use super::scheduler::DisplayScheduler;

/// Display-scheduler list plus the display-thread id counter.
pub struct DisplayRegistry {
    schedulers: Mutex<Vec<Arc<DisplayScheduler>>>,
    next_id: AtomicU32,
}

impl DisplayRegistry {
    pub fn new() -> Self {
        Self {
            schedulers: Mutex::new(Vec::new()),
            next_id: AtomicU32::new(1),
        }
    }

    /// Live scheduler count (all groups).
    pub fn scheduler_count(&self) -> usize {
        self.schedulers.lock().expect("display list poisoned").len()
    }

    /// Puts `key` on a scheduler for `group_id`, creating one if every
    /// existing scheduler of the group is full.
    pub(crate) fn place(&self, core: &Arc<Core>, key: RecordKey, alarm_id: u32, group_id: u32) {
        let now = Utc::now().timestamp();
        let event = {
            let mut schedulers = self.schedulers.lock().expect("display list poisoned");

            let assigned = schedulers
                .iter()
                .find(|s| s.group_id() == group_id && s.try_assign(key))
                .map(|s| s.id());

            match assigned {
                Some(display) => Event::AlarmAssigned {
                    display,
                    group_id,
                    alarm_id,
                    at: now,
                },
                None => {
                    let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                    let sched = Arc::new(DisplayScheduler::new(id, group_id, key));
                    schedulers.push(Arc::clone(&sched));

                    let worker_core = Arc::clone(core);
                    let spawned = thread::Builder::new()
                        .name(format!("display-g{group_id}-{id}"))
                        .spawn(move || sched.run(worker_core));
                    if let Err(err) = spawned {
                        // No partial unwind of shared state is possible here.
                        eprintln!("fatal: failed to spawn display thread: {err}");
                        std::process::exit(1);
                    }

                    Event::DisplayCreated {
                        display: id,
                        group_id,
                        at: now,
                    }
                }
            }
        };
        core.emit(event);
    }

    /// Removes `sched` from the list if it is still empty. Returns whether
    /// the scheduler may exit.
    pub(crate) fn retire(&self, sched: &DisplayScheduler) -> bool {
        let mut schedulers = self.schedulers.lock().expect("display list poisoned");
        if sched.slot_count() != 0 {
            return false;
        }
        schedulers.retain(|s| s.id() != sched.id());
        true
    }
}

impl Default for DisplayRegistry {
    fn default() -> Self {
        Self::new()
    }
}
