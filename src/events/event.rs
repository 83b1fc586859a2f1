//! Log events emitted by the workers.
//!
//! Every observable action in the system is a typed [`Event`]; the sink a
//! worker hands it to decides where the formatted line goes (the console in
//! the binary, a memory buffer in tests). The `Display` impl is the single
//! source of truth for the line catalogue:
//!
//! ```text
//! Alarm Thread has Inserted Start_Alarm Request(1) at 1712000000: 1712000000 into Circular_Buffer Index: 0
//! Consumer Thread has Retrieved Start_Alarm Request(1) at 1712000000: 1712000000 from Circular_Buffer Index: 0
//! Start_Alarm(1) Inserted by Consumer Thread 1 Into Alarm List: Group(10) 1712000000 2 60 hello
//! New Display Alarm Thread 1 Created for Group(10) at 1712000001
//! Alarm (1) Printed by Alarm Display Thread 1 at 1712000002: Group(10) 1712000000 2 60 hello
//! Display Thread 1 Has Stopped Printing Expired Alarm(1) at 1712000060: Group(10) 1712000000 2 60 hello
//! ```

use std::fmt;

use crate::alarms::{AlarmRecord, RequestKind};

/// Identifying fields of an alarm as they appear in log lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmInfo {
    pub alarm_id: u32,
    pub group_id: u32,
    pub time_stamp: i64,
    pub interval: i64,
    pub time: i64,
    pub message: String,
}

impl From<&AlarmRecord> for AlarmInfo {
    fn from(record: &AlarmRecord) -> Self {
        Self {
            alarm_id: record.alarm_id,
            group_id: record.group_id,
            time_stamp: record.time_stamp,
            interval: record.interval,
            time: record.time,
            message: record.message.clone(),
        }
    }
}

impl fmt::Display for AlarmInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Group({}) {} {} {} {}",
            self.group_id, self.time_stamp, self.interval, self.time, self.message
        )
    }
}

/// State-change notices a display scheduler can announce for one alarm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayNotice {
    /// The alarm disappeared or was marked for removal (cancellation), or
    /// this scheduler is the old owner after a group move.
    StoppedPrinting,
    /// The alarm's expiry passed.
    StoppedExpired,
    /// This scheduler is the new owner after a group move.
    TakenOver,
    /// The message text changed in place.
    ChangedMessage,
    /// The print interval changed in place.
    ChangedInterval,
}

/// A single log line, one variant per catalogue entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Producer stored a request in the ring buffer.
    QueueInserted {
        kind: RequestKind,
        alarm_id: u32,
        at: i64,
        time_stamp: i64,
        index: usize,
    },
    /// Dispatcher retrieved a request from the ring buffer.
    QueueRetrieved {
        kind: RequestKind,
        alarm_id: u32,
        at: i64,
        time_stamp: i64,
        index: usize,
    },
    /// Dispatcher filed a request into the alarm table or change list.
    RequestFiled {
        kind: RequestKind,
        consumer: u32,
        info: AlarmInfo,
    },
    /// A display scheduler thread was created for a group.
    DisplayCreated { display: u32, group_id: u32, at: i64 },
    /// An alarm was placed on an existing display scheduler.
    AlarmAssigned {
        display: u32,
        group_id: u32,
        alarm_id: u32,
        at: i64,
    },
    /// Periodic print of an alarm message.
    Printed {
        display: u32,
        at: i64,
        info: AlarmInfo,
    },
    /// A display scheduler announced a state change for one alarm.
    Notice {
        notice: DisplayNotice,
        display: u32,
        at: i64,
        info: AlarmInfo,
    },
    /// A display scheduler ran out of alarms and is exiting.
    GroupEmpty { display: u32, group_id: u32, at: i64 },
    /// The changer applied a change to a live alarm.
    Changed {
        alarm_id: u32,
        at: i64,
        group_id: u32,
        time: i64,
        message: String,
    },
    /// A change targeted an alarm id with no live alarm.
    InvalidChange {
        alarm_id: u32,
        at: i64,
        group_id: u32,
        time: i64,
        message: String,
    },
    /// A cancel/suspend/reactivate targeted an alarm id with no live alarm.
    InvalidControl {
        kind: RequestKind,
        alarm_id: u32,
        at: i64,
    },
    Suspended { alarm_id: u32, at: i64 },
    Reactivated { alarm_id: u32, at: i64 },
    /// Header line of a view listing.
    ViewHeader { at: i64 },
    /// One alarm in a view listing.
    ViewEntry {
        index: usize,
        state: &'static str,
        info: AlarmInfo,
    },
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::QueueInserted {
                kind,
                alarm_id,
                at,
                time_stamp,
                index,
            } => write!(
                f,
                "Alarm Thread has Inserted {} Request({}) at {}: {} into Circular_Buffer Index: {}",
                kind.as_str(),
                alarm_id,
                at,
                time_stamp,
                index
            ),
            Event::QueueRetrieved {
                kind,
                alarm_id,
                at,
                time_stamp,
                index,
            } => write!(
                f,
                "Consumer Thread has Retrieved {} Request({}) at {}: {} from Circular_Buffer Index: {}",
                kind.as_str(),
                alarm_id,
                at,
                time_stamp,
                index
            ),
            Event::RequestFiled {
                kind,
                consumer,
                info,
            } => match kind {
                RequestKind::Start => write!(
                    f,
                    "Start_Alarm({}) Inserted by Consumer Thread {} Into Alarm List: {}",
                    info.alarm_id, consumer, info
                ),
                RequestKind::Change => write!(
                    f,
                    "Change_Alarm({}) Inserted by Consumer Thread {} into Separate Change Alarm Request List: Group({}) {} {} {}",
                    info.alarm_id,
                    consumer,
                    info.group_id,
                    info.time_stamp,
                    info.time,
                    info.message
                ),
                RequestKind::View => write!(
                    f,
                    "View_Alarms Request Inserted by Consumer Thread {} Into Alarm List: {}",
                    consumer, info.time_stamp
                ),
                _ => write!(
                    f,
                    "{}({}) Inserted by Consumer Thread {} Into Alarm List: {}",
                    kind.as_str(),
                    info.alarm_id,
                    consumer,
                    info.time_stamp
                ),
            },
            Event::DisplayCreated {
                display,
                group_id,
                at,
            } => write!(
                f,
                "New Display Alarm Thread {} Created for Group({}) at {}",
                display, group_id, at
            ),
            Event::AlarmAssigned {
                display,
                group_id,
                alarm_id,
                at,
            } => write!(
                f,
                "Alarm({}) Assigned to Display Alarm Thread {} for Group({}) at {}",
                alarm_id, display, group_id, at
            ),
            Event::Printed { display, at, info } => write!(
                f,
                "Alarm ({}) Printed by Alarm Display Thread {} at {}: {}",
                info.alarm_id, display, at, info
            ),
            Event::Notice {
                notice,
                display,
                at,
                info,
            } => {
                let phrase = match notice {
                    DisplayNotice::StoppedPrinting => "Has Stopped Printing Message of",
                    DisplayNotice::StoppedExpired => "Has Stopped Printing Expired",
                    DisplayNotice::TakenOver => "Has Taken Over Printing Message of",
                    DisplayNotice::ChangedMessage => "Starts to Print Changed Message",
                    DisplayNotice::ChangedInterval => "Starts to Print Changed Interval Value",
                };
                write!(
                    f,
                    "Display Thread {} {} Alarm({}) at {}: {}",
                    display, phrase, info.alarm_id, at, info
                )
            }
            Event::GroupEmpty {
                display,
                group_id,
                at,
            } => write!(
                f,
                "No More Alarms in Group({}): Display Thread {} exiting at {}",
                group_id, display, at
            ),
            Event::Changed {
                alarm_id,
                at,
                group_id,
                time,
                message,
            } => write!(
                f,
                "Alarm({}) Changed at {}: Group({}) {} {}",
                alarm_id, at, group_id, time, message
            ),
            Event::InvalidChange {
                alarm_id,
                at,
                group_id,
                time,
                message,
            } => write!(
                f,
                "Invalid Change Alarm Request({}) at {}: Group({}) {} {}",
                alarm_id, at, group_id, time, message
            ),
            Event::InvalidControl { kind, alarm_id, at } => {
                let verb = match kind {
                    RequestKind::Start => "Start",
                    RequestKind::Change => "Change",
                    RequestKind::Cancel => "Cancel",
                    RequestKind::Suspend => "Suspend",
                    RequestKind::Reactivate => "Reactivate",
                    RequestKind::View => "View",
                };
                write!(f, "Invalid {} Alarm Request({}) at {}", verb, alarm_id, at)
            }
            Event::Suspended { alarm_id, at } => {
                write!(f, "Alarm({}) Suspended at {}", alarm_id, at)
            }
            Event::Reactivated { alarm_id, at } => {
                write!(f, "Alarm({}) Reactivated at {}", alarm_id, at)
            }
            Event::ViewHeader { at } => write!(f, "View Alarms at View Time {}:", at),
            Event::ViewEntry { index, state, info } => write!(
                f,
                "{}. Alarm({}): {} Group({}) {} {} {} {}",
                index,
                info.alarm_id,
                state,
                info.group_id,
                info.time_stamp,
                info.interval,
                info.time,
                info.message
            ),
        }
    }
}
