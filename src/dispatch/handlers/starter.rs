//! Starter: activates pending alarms and places them on display schedulers.

use std::sync::Arc;

use chrono::Utc;

use crate::alarms::{AlarmState, RecordKey, RequestKind};
use crate::dispatch::context::Core;
use crate::events::Event;

enum Claim {
    /// A pending Start was activated and needs a display slot.
    Placed {
        key: RecordKey,
        alarm_id: u32,
        group_id: u32,
    },
    /// The id already names a live alarm; the request was dropped.
    Duplicate { alarm_id: u32 },
    Idle,
}

pub(crate) fn run(core: Arc<Core>) {
    loop {
        let seen = core.signals.start.epoch();
        match claim(&core) {
            Claim::Placed {
                key,
                alarm_id,
                group_id,
            } => core.displays.place(&core, key, alarm_id, group_id),
            Claim::Duplicate { alarm_id } => core.emit(Event::InvalidControl {
                kind: RequestKind::Start,
                alarm_id,
                at: Utc::now().timestamp(),
            }),
            Claim::Idle => core.signals.start.wait_past(seen),
        }
    }
}

/// Picks the most recent pending Start and marks it Active. The writer
/// lock is released before any display placement happens.
fn claim(core: &Core) -> Claim {
    let mut tables = core.tables.write();
    let Some(key) = tables.alarms.latest_pending_start() else {
        return Claim::Idle;
    };
    let Some((alarm_id, group_id)) = tables.alarms.get(key).map(|r| (r.alarm_id, r.group_id))
    else {
        return Claim::Idle;
    };

    // A live alarm already owns this id; keep ids unique.
    let duplicate = tables.alarms.iter().any(|(k, r)| {
        k != key
            && r.kind == RequestKind::Start
            && r.alarm_id == alarm_id
            && matches!(r.status.state, AlarmState::Active | AlarmState::Suspended)
    });
    if duplicate {
        tables.alarms.remove(key);
        return Claim::Duplicate { alarm_id };
    }

    if let Some(record) = tables.alarms.get_mut(key) {
        record.status.state = AlarmState::Active;
    }
    Claim::Placed {
        key,
        alarm_id,
        group_id,
    }
}
