//! Alarm and request records.
//!
//! One record type covers both live alarms and the transient request
//! records that ride the queue: a `Start` record stays in the table for the
//! alarm's lifetime, every other kind is consumed by its handler.

use chrono::Utc;

/// What a queued record asks the system to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Register a new periodic alarm.
    Start,
    /// Update time/expiry/message (and possibly group) of a live alarm.
    Change,
    /// Cancel a live alarm.
    Cancel,
    /// Pause printing without losing the alarm.
    Suspend,
    /// Resume a suspended alarm.
    Reactivate,
    /// List alarms admitted before the request.
    View,
}

impl RequestKind {
    /// Command-grammar spelling, used verbatim in log lines.
    pub fn as_str(self) -> &'static str {
        match self {
            RequestKind::Start => "Start_Alarm",
            RequestKind::Change => "Change_Alarm",
            RequestKind::Cancel => "Cancel_Alarm",
            RequestKind::Suspend => "Suspend_Alarm",
            RequestKind::Reactivate => "Reactivate_Alarm",
            RequestKind::View => "View_Alarms",
        }
    }
}

/// Lifecycle state of a Start record.
///
/// Exactly one state holds at a time; `Pending` marks a record the starter
/// has not yet claimed and placed on a display scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmState {
    Pending,
    Active,
    Suspended,
    /// Marked for removal; owned by the display scheduler holding it, which
    /// unlinks the record.
    Remove,
}

/// State plus the one-shot group hand-off flag.
///
/// `moved` is orthogonal to the state: the changer raises it when an
/// alarm's group changes, and the display scheduler that takes the alarm
/// over acknowledges it snapshot-side. It is never copied into a freshly
/// materialized snapshot, which is what makes a second move observable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlarmStatus {
    pub state: AlarmState,
    pub moved: bool,
}

impl AlarmStatus {
    pub fn pending() -> Self {
        Self {
            state: AlarmState::Pending,
            moved: false,
        }
    }
}

/// A single alarm or request record.
#[derive(Debug, Clone)]
pub struct AlarmRecord {
    pub kind: RequestKind,
    pub status: AlarmStatus,
    /// User-assigned id; unique per live alarm. Zero only for `View`.
    pub alarm_id: u32,
    /// User-assigned display group.
    pub group_id: u32,
    /// Wall-clock seconds at admission.
    pub time_stamp: i64,
    /// Admission sequence; total order among equal time stamps.
    pub seq: u64,
    /// Seconds until expiry at creation/change time.
    pub time: i64,
    /// Absolute expiry, wall-clock seconds.
    pub expiry: i64,
    /// Seconds between periodic prints.
    pub interval: i64,
    pub message: String,
}

impl AlarmRecord {
    /// Builds a `Start` request stamped with the current wall clock.
    pub fn start(alarm_id: u32, group_id: u32, interval: i64, time: i64, message: String) -> Self {
        let now = Utc::now().timestamp();
        Self {
            kind: RequestKind::Start,
            status: AlarmStatus::pending(),
            alarm_id,
            group_id,
            time_stamp: now,
            seq: 0,
            time,
            expiry: now + time,
            interval,
            message,
        }
    }

    /// Builds a `Change` request; the interval is not part of the grammar
    /// and stays untouched on the target alarm.
    pub fn change(alarm_id: u32, group_id: u32, time: i64, message: String) -> Self {
        let now = Utc::now().timestamp();
        Self {
            kind: RequestKind::Change,
            status: AlarmStatus::pending(),
            alarm_id,
            group_id,
            time_stamp: now,
            seq: 0,
            time,
            expiry: now + time,
            interval: 0,
            message,
        }
    }

    /// Builds a Cancel/Suspend/Reactivate request carrying only the id.
    pub fn control(kind: RequestKind, alarm_id: u32) -> Self {
        debug_assert!(matches!(
            kind,
            RequestKind::Cancel | RequestKind::Suspend | RequestKind::Reactivate
        ));
        Self {
            kind,
            status: AlarmStatus::pending(),
            alarm_id,
            group_id: 0,
            time_stamp: Utc::now().timestamp(),
            seq: 0,
            time: 0,
            expiry: 0,
            interval: 0,
            message: String::new(),
        }
    }

    /// Builds a `View` request.
    pub fn view() -> Self {
        Self {
            kind: RequestKind::View,
            status: AlarmStatus::pending(),
            alarm_id: 0,
            group_id: 0,
            time_stamp: Utc::now().timestamp(),
            seq: 0,
            time: 0,
            expiry: 0,
            interval: 0,
            message: String::new(),
        }
    }

    /// True for live alarms the round-robin and group queries consider.
    pub fn is_displayable(&self) -> bool {
        self.kind == RequestKind::Start
            && matches!(self.status.state, AlarmState::Active | AlarmState::Suspended)
    }
}
