//! Per-group display scheduler.
//!
//! One worker thread per active group, owning up to two slots. Each tick it
//! reconciles its snapshots against the table, prints whatever is due when
//! the round-robin says it is this group's turn, and exits once its last
//! slot empties.
//!
//! ## Architecture
//! ```text
//! loop every tick:
//!   ├─► count == 0 → retire from registry → "No More Alarms" → exit
//!   ├─► materialize snapshots for newly filled slots   (reader lock)
//!   ├─► reader lock → slot mutex
//!   │     ├─► rotation says not our turn → release, next tick
//!   │     └─► per slot: reconcile → print / acknowledge / drop
//!   │             └─► cursor update (largest group closes the cycle)
//!   └─► unlink removed records                         (writer lock)
//! ```
//!
//! ## Rules
//! - Snapshots are thread-local; only the slot keys are shared (the
//!   starter and changer fill slots through [`try_assign`]).
//! - Records are unlinked *after* the reader lock is released; the lock
//!   order never allows upgrading a read into a write.
//! - A slot dropped for a group move is not unlinked; the new group's
//!   scheduler owns the record from then on.
//!
//! [`try_assign`]: DisplayScheduler::try_assign

use std::sync::{Arc, Mutex};
use std::thread;

use chrono::Utc;

use crate::alarms::RecordKey;
use crate::dispatch::Core;
use crate::events::Event;

use super::snapshot::{SlotOutcome, Snapshot};

/// Hard capacity of one display scheduler.
pub const SLOTS_PER_SCHEDULER: usize = 2;

struct Slots {
    keys: [Option<RecordKey>; SLOTS_PER_SCHEDULER],
    count: usize,
}

/// Shared handle to one display worker.
pub struct DisplayScheduler {
    id: u32,
    group_id: u32,
    slots: Mutex<Slots>,
}

impl DisplayScheduler {
    pub(crate) fn new(id: u32, group_id: u32, first: RecordKey) -> Self {
        Self {
            id,
            group_id,
            slots: Mutex::new(Slots {
                keys: [Some(first), None],
                count: 1,
            }),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn group_id(&self) -> u32 {
        self.group_id
    }

    pub fn slot_count(&self) -> usize {
        self.slots.lock().expect("scheduler mutex poisoned").count
    }

    /// Stores `key` in the first empty slot; fails when both are taken.
    pub(crate) fn try_assign(&self, key: RecordKey) -> bool {
        let mut slots = self.slots.lock().expect("scheduler mutex poisoned");
        if slots.count >= SLOTS_PER_SCHEDULER {
            return false;
        }
        if let Some(empty) = slots.keys.iter().position(Option::is_none) {
            slots.keys[empty] = Some(key);
            slots.count += 1;
            return true;
        }
        false
    }

    /// Worker loop; runs until the group empties.
    pub(crate) fn run(self: Arc<Self>, core: Arc<Core>) {
        let mut snapshots: [Option<Snapshot>; SLOTS_PER_SCHEDULER] = [None, None];

        loop {
            thread::sleep(core.cfg.tick);
            let now = Utc::now().timestamp();

            if self.slot_count() == 0 {
                // Re-checked under the registry lock so a placement landing
                // right now keeps the thread alive.
                if core.displays.retire(&self) {
                    core.emit(Event::GroupEmpty {
                        display: self.id,
                        group_id: self.group_id,
                        at: now,
                    });
                    return;
                }
                continue;
            }

            self.materialize(&core, &mut snapshots);

            let mut unlink: Vec<RecordKey> = Vec::new();
            {
                let tables = core.tables.read();
                let mut slots = self.slots.lock().expect("scheduler mutex poisoned");

                if !core.rotation.is_next(self.group_id, &tables.alarms) {
                    continue;
                }

                for i in 0..SLOTS_PER_SCHEDULER {
                    let Some(key) = slots.keys[i] else { continue };
                    let Some(mut snap) = snapshots[i].take() else {
                        continue;
                    };

                    let record = tables.alarms.get(key);
                    let outcome = snap.reconcile(record, self.id, now, core.sink.as_ref());
                    if outcome == SlotOutcome::Live {
                        snap.maybe_print(self.id, now, core.sink.as_ref());
                    }

                    let largest = tables.alarms.is_largest_group(self.group_id);
                    core.rotation.note_displayed(snap.alarm_id, largest);

                    match outcome {
                        SlotOutcome::Dropped { unlink: do_unlink } => {
                            if do_unlink {
                                unlink.push(key);
                            }
                            slots.keys[i] = None;
                            slots.count -= 1;
                        }
                        _ => snapshots[i] = Some(snap),
                    }
                }
            }

            if !unlink.is_empty() {
                let mut tables = core.tables.write();
                for key in unlink {
                    tables.alarms.remove(key);
                }
            }
        }
    }

    /// Builds snapshots for slots filled since the last tick.
    fn materialize(&self, core: &Core, snapshots: &mut [Option<Snapshot>; SLOTS_PER_SCHEDULER]) {
        let tables = core.tables.read();
        let mut slots = self.slots.lock().expect("scheduler mutex poisoned");
        for i in 0..SLOTS_PER_SCHEDULER {
            if snapshots[i].is_some() {
                continue;
            }
            let Some(key) = slots.keys[i] else { continue };
            match tables.alarms.get(key) {
                Some(record) => snapshots[i] = Some(Snapshot::capture(record)),
                // The record vanished before it was ever observed; nothing
                // to announce, just release the slot.
                None => {
                    slots.keys[i] = None;
                    slots.count -= 1;
                }
            }
        }
    }
}
