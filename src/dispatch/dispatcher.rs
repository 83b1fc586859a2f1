//! Queue consumer: files requests and wakes handlers.
//!
//! Single worker. Each iteration drains one record from the ring, logs the
//! retrieval with the slot index, files the record under the writer lock
//! (Change records go to the dedicated change-request list, everything else
//! to the alarm list), logs the insertion, and signals exactly one handler
//! condition based on the request kind.

use std::sync::Arc;

use chrono::Utc;

use crate::alarms::RequestKind;
use crate::events::{AlarmInfo, Event};

use super::context::Core;

pub(crate) fn run(core: Arc<Core>, consumer: u32) {
    loop {
        let (record, index) = core.queue.pop();
        core.emit(Event::QueueRetrieved {
            kind: record.kind,
            alarm_id: record.alarm_id,
            at: Utc::now().timestamp(),
            time_stamp: record.time_stamp,
            index,
        });

        let kind = record.kind;
        let info = AlarmInfo::from(&record);
        {
            let mut tables = core.tables.write();
            if kind == RequestKind::Change {
                tables.changes.insert(record);
            } else {
                tables.alarms.insert(record);
            }
        }
        core.emit(Event::RequestFiled {
            kind,
            consumer,
            info,
        });

        match kind {
            RequestKind::Start => core.signals.start.notify(),
            RequestKind::Change => core.signals.change.notify(),
            RequestKind::Cancel => core.signals.remove.notify(),
            RequestKind::Suspend | RequestKind::Reactivate => core.signals.suspend.notify(),
            RequestKind::View => core.signals.view.notify(),
        }
    }
}
