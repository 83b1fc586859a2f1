//! Per-slot snapshots and the reconciliation rules.
//!
//! A display scheduler never prints straight from the shared table; it
//! keeps a private snapshot per slot and compares it against the live
//! record each tick. The comparison is what makes cancellations, expiry,
//! group moves, and field edits *visible*: every difference maps to one
//! announcement, then the snapshot absorbs the new state.
//!
//! ## Rules
//! - A freshly captured snapshot never carries the moved flag; the flag
//!   difference is exactly how the new owner detects a hand-off.
//! - Rules are checked in order: gone/removed, expired, group mismatch
//!   (old owner), hand-off (new owner), message edit, interval edit.
//! - The hand-off acknowledgement skips printing for that cycle.
//! - Each slot reconciles independently of the other.

use crate::alarms::{AlarmRecord, AlarmState};
use crate::events::{AlarmInfo, DisplayNotice, Event, EventSink};

/// What the scheduler should do with a slot after reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotOutcome {
    /// Slot stays; the periodic print may run this cycle.
    Live,
    /// Hand-off acknowledged; keep the slot but skip printing this cycle.
    TakenOver,
    /// Clear the slot; unlink the record from the table if `unlink`.
    Dropped { unlink: bool },
}

/// Locally observed state of one assigned alarm.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub alarm_id: u32,
    pub group_id: u32,
    pub state: AlarmState,
    pub moved: bool,
    pub time_stamp: i64,
    pub interval: i64,
    pub time: i64,
    pub message: String,
    pub last_print_time: i64,
}

impl Snapshot {
    /// Captures a record's observable state. The moved flag is deliberately
    /// not copied.
    pub fn capture(record: &AlarmRecord) -> Self {
        Self {
            alarm_id: record.alarm_id,
            group_id: record.group_id,
            state: record.status.state,
            moved: false,
            time_stamp: record.time_stamp,
            interval: record.interval,
            time: record.time,
            message: record.message.clone(),
            last_print_time: 0,
        }
    }

    fn info(&self) -> AlarmInfo {
        AlarmInfo {
            alarm_id: self.alarm_id,
            group_id: self.group_id,
            time_stamp: self.time_stamp,
            interval: self.interval,
            time: self.time,
            message: self.message.clone(),
        }
    }

    /// Compares the snapshot with the live record and announces every
    /// difference. Returns what to do with the slot.
    pub fn reconcile(
        &mut self,
        record: Option<&AlarmRecord>,
        display: u32,
        now: i64,
        sink: &dyn EventSink,
    ) -> SlotOutcome {
        let Some(record) = record else {
            // The record was already unlinked; announce and let go.
            sink.emit(&Event::Notice {
                notice: DisplayNotice::StoppedPrinting,
                display,
                at: now,
                info: self.info(),
            });
            self.state = AlarmState::Remove;
            return SlotOutcome::Dropped { unlink: false };
        };

        if record.status.state == AlarmState::Remove {
            sink.emit(&Event::Notice {
                notice: DisplayNotice::StoppedPrinting,
                display,
                at: now,
                info: self.info(),
            });
            self.state = AlarmState::Remove;
            return SlotOutcome::Dropped { unlink: true };
        }

        if record.expiry <= now {
            sink.emit(&Event::Notice {
                notice: DisplayNotice::StoppedExpired,
                display,
                at: now,
                info: self.info(),
            });
            self.state = AlarmState::Remove;
            return SlotOutcome::Dropped { unlink: true };
        }

        if record.group_id != self.group_id {
            // This scheduler is the old owner; the record lives on under a
            // new group, so the table keeps it.
            sink.emit(&Event::Notice {
                notice: DisplayNotice::StoppedPrinting,
                display,
                at: now,
                info: AlarmInfo::from(record),
            });
            self.state = AlarmState::Remove;
            return SlotOutcome::Dropped { unlink: false };
        }

        if record.status.moved && !self.moved {
            sink.emit(&Event::Notice {
                notice: DisplayNotice::TakenOver,
                display,
                at: now,
                info: AlarmInfo::from(record),
            });
            self.moved = true;
            return SlotOutcome::TakenOver;
        }

        if record.message != self.message {
            sink.emit(&Event::Notice {
                notice: DisplayNotice::ChangedMessage,
                display,
                at: now,
                info: AlarmInfo::from(record),
            });
            self.message = record.message.clone();
        }

        if record.interval != self.interval {
            sink.emit(&Event::Notice {
                notice: DisplayNotice::ChangedInterval,
                display,
                at: now,
                info: AlarmInfo::from(record),
            });
            self.interval = record.interval;
        }

        self.time = record.time;
        self.state = record.status.state;
        self.moved = record.status.moved;
        SlotOutcome::Live
    }

    /// Emits the periodic print line when the alarm is due.
    pub fn maybe_print(&mut self, display: u32, now: i64, sink: &dyn EventSink) {
        if matches!(self.state, AlarmState::Remove | AlarmState::Suspended) {
            return;
        }
        if now - self.last_print_time > self.interval {
            sink.emit(&Event::Printed {
                display,
                at: now,
                info: self.info(),
            });
            self.last_print_time = now;
        }
    }
}
