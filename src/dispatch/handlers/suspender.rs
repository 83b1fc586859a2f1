//! Suspender/Reactivator: toggles printing for a live alarm.
//!
//! A Suspend or Reactivate request targets the Start record with the same
//! id admitted strictly before it. Only the two sensible transitions do
//! anything (Suspend on Active, Reactivate on Suspended); everything else
//! is a silent no-op, and a request with no earlier Start is reported as
//! invalid. The request record is consumed in all cases.

use std::sync::Arc;

use chrono::Utc;

use crate::alarms::{AlarmState, RequestKind};
use crate::dispatch::context::Core;
use crate::events::Event;

pub(crate) fn run(core: Arc<Core>) {
    loop {
        let seen = core.signals.suspend.epoch();
        if !apply_next(&core) {
            core.signals.suspend.wait_past(seen);
        }
    }
}

fn apply_next(core: &Core) -> bool {
    let now = Utc::now().timestamp();
    let mut event = None;
    {
        let mut tables = core.tables.write();
        let Some(key) = tables
            .alarms
            .latest_of_kinds(&[RequestKind::Suspend, RequestKind::Reactivate])
        else {
            return false;
        };
        let Some(request) = tables.alarms.remove(key) else {
            return true;
        };

        match tables
            .alarms
            .find_start_before(request.alarm_id, request.time_stamp, request.seq)
        {
            None => {
                event = Some(Event::InvalidControl {
                    kind: request.kind,
                    alarm_id: request.alarm_id,
                    at: now,
                });
            }
            Some(start_key) => {
                if let Some(record) = tables.alarms.get_mut(start_key) {
                    match (request.kind, record.status.state) {
                        (RequestKind::Suspend, AlarmState::Active) => {
                            record.status.state = AlarmState::Suspended;
                            event = Some(Event::Suspended {
                                alarm_id: request.alarm_id,
                                at: now,
                            });
                        }
                        (RequestKind::Reactivate, AlarmState::Suspended) => {
                            record.status.state = AlarmState::Active;
                            event = Some(Event::Reactivated {
                                alarm_id: request.alarm_id,
                                at: now,
                            });
                        }
                        _ => {}
                    }
                }
            }
        }
    }
    if let Some(ev) = event {
        core.emit(ev);
    }
    true
}
