//! Canceller: marks live alarms for removal.
//!
//! The cancel handler only *marks*: it sets the target's state to Remove
//! under the writer lock and lets the display scheduler holding the alarm
//! announce the stop and unlink the record. An alarm cancelled before the
//! starter ever placed it has no owner, so it is unlinked here directly.

use std::sync::Arc;

use chrono::Utc;

use crate::alarms::{AlarmState, RequestKind};
use crate::dispatch::context::Core;
use crate::events::Event;

pub(crate) fn run(core: Arc<Core>) {
    loop {
        let seen = core.signals.remove.epoch();
        if !apply_next(&core) {
            core.signals.remove.wait_past(seen);
        }
    }
}

fn apply_next(core: &Core) -> bool {
    let now = Utc::now().timestamp();
    let mut event = None;
    {
        let mut tables = core.tables.write();
        let Some(key) = tables.alarms.latest_of_kinds(&[RequestKind::Cancel]) else {
            return false;
        };
        let Some(request) = tables.alarms.remove(key) else {
            return true;
        };

        match tables.alarms.find_start(request.alarm_id) {
            None => {
                event = Some(Event::InvalidControl {
                    kind: RequestKind::Cancel,
                    alarm_id: request.alarm_id,
                    at: now,
                });
            }
            Some(start_key) => {
                let pending = tables
                    .alarms
                    .get(start_key)
                    .map(|r| r.status.state == AlarmState::Pending)
                    .unwrap_or(false);
                if pending {
                    tables.alarms.remove(start_key);
                } else if let Some(record) = tables.alarms.get_mut(start_key) {
                    record.status.state = AlarmState::Remove;
                }
            }
        }
    }
    if let Some(ev) = event {
        core.emit(ev);
    }
    true
}
