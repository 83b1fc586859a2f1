//! Changer: applies pending change requests to live alarms.
//!
//! Changes come from the dedicated change-request list. A change copies
//! `time`, `expiry`, and `message` into the target Start record; a change
//! that also moves the alarm to another group raises the one-shot moved
//! flag and re-places the alarm on a scheduler for the new group through
//! the same placement routine the starter uses. The old group's scheduler
//! notices the group mismatch on its next tick and lets go.

use std::sync::Arc;

use chrono::Utc;

use crate::alarms::{RecordKey, RequestKind};
use crate::dispatch::context::Core;
use crate::events::Event;

pub(crate) fn run(core: Arc<Core>) {
    loop {
        let seen = core.signals.change.epoch();
        if !apply_next(&core) {
            core.signals.change.wait_past(seen);
        }
    }
}

/// Applies the most recent pending change. Returns false when the pending
/// list was empty.
fn apply_next(core: &Arc<Core>) -> bool {
    let now = Utc::now().timestamp();
    let mut moved: Option<(RecordKey, u32, u32)> = None;
    let event;
    {
        let mut tables = core.tables.write();
        let Some(key) = tables.changes.latest_of_kinds(&[RequestKind::Change]) else {
            return false;
        };
        let Some(change) = tables.changes.remove(key) else {
            return true;
        };

        match tables.alarms.find_start(change.alarm_id) {
            None => {
                event = Event::InvalidChange {
                    alarm_id: change.alarm_id,
                    at: now,
                    group_id: change.group_id,
                    time: change.time,
                    message: change.message,
                };
            }
            Some(start_key) => {
                if let Some(record) = tables.alarms.get_mut(start_key) {
                    record.time = change.time;
                    record.expiry = change.expiry;
                    record.message = change.message.clone();
                    if record.group_id != change.group_id {
                        record.group_id = change.group_id;
                        record.status.moved = true;
                        moved = Some((start_key, record.alarm_id, change.group_id));
                    }
                }
                event = Event::Changed {
                    alarm_id: change.alarm_id,
                    at: now,
                    group_id: change.group_id,
                    time: change.time,
                    message: change.message,
                };
            }
        }
    }
    core.emit(event);
    if let Some((key, alarm_id, group_id)) = moved {
        core.displays.place(core, key, alarm_id, group_id);
    }
    true
}
