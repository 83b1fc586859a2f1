//! Viewer: lists alarms admitted before the view request.

use std::sync::Arc;

use crate::alarms::{AlarmState, RequestKind};
use crate::dispatch::context::Core;
use crate::events::{AlarmInfo, Event};

pub(crate) fn run(core: Arc<Core>) {
    loop {
        let seen = core.signals.view.epoch();
        if !serve_next(&core) {
            core.signals.view.wait_past(seen);
        }
    }
}

fn state_label(state: AlarmState) -> &'static str {
    match state {
        AlarmState::Pending => "Pending",
        AlarmState::Active => "Active",
        AlarmState::Suspended => "Suspended",
        AlarmState::Remove => "Remove",
    }
}

/// Serves the most recent view request: enumerates Start records strictly
/// older than the request under the reader lock, then unlinks the request.
fn serve_next(core: &Core) -> bool {
    let mut events = Vec::new();
    let request_key;
    {
        let tables = core.tables.read();
        let Some(key) = tables.alarms.latest_of_kinds(&[RequestKind::View]) else {
            return false;
        };
        request_key = key;
        let Some(request) = tables.alarms.get(key) else {
            return true;
        };

        events.push(Event::ViewHeader {
            at: request.time_stamp,
        });
        let mut index = 1;
        for (_, record) in tables.alarms.iter() {
            if record.kind == RequestKind::Start
                && record.time_stamp < request.time_stamp
                && record.status.state != AlarmState::Remove
            {
                events.push(Event::ViewEntry {
                    index,
                    state: state_label(record.status.state),
                    info: AlarmInfo::from(record),
                });
                index += 1;
            }
        }
    }
    core.tables.write().alarms.remove(request_key);
    for event in events {
        core.emit(event);
    }
    true
}
