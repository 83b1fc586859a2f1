//! Timestamp-ordered alarm list with stable keys.
//!
//! An ordered `Vec` of records addressed by monotonically increasing
//! [`RecordKey`]s that are never reused; searches are O(N), which is fine
//! at console scale. A display scheduler holds keys, and a key that no
//! longer resolves is the "alarm is gone" observation the reconciliation
//! rules react to.
//!
//! ## Rules
//! - Insertion keeps the sequence ordered by `time_stamp`, with equal
//!   stamps kept in admission order.
//! - "Most recent" selectors therefore return the last match in iteration
//!   order.
//! - All access goes through the [`TableLock`](crate::sync::TableLock)
//!   wrapping [`Tables`]; this module contains no synchronization of its
//!   own.

use super::record::{AlarmRecord, AlarmState, RequestKind};

/// Stable handle to a record; never reused after removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordKey(u64);

/// Ordered sequence of alarm records.
pub struct AlarmList {
    entries: Vec<(RecordKey, AlarmRecord)>,
    next_key: u64,
    next_seq: u64,
}

impl AlarmList {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_key: 0,
            next_seq: 0,
        }
    }

    /// Inserts in `time_stamp` order (after all equal stamps), stamping the
    /// record's admission sequence. Returns the record's key.
    pub fn insert(&mut self, mut record: AlarmRecord) -> RecordKey {
        let key = RecordKey(self.next_key);
        self.next_key += 1;
        record.seq = self.next_seq;
        self.next_seq += 1;

        let pos = self
            .entries
            .iter()
            .position(|(_, r)| r.time_stamp > record.time_stamp)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, (key, record));
        key
    }

    pub fn get(&self, key: RecordKey) -> Option<&AlarmRecord> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, r)| r)
    }

    pub fn get_mut(&mut self, key: RecordKey) -> Option<&mut AlarmRecord> {
        self.entries
            .iter_mut()
            .find(|(k, _)| *k == key)
            .map(|(_, r)| r)
    }

    /// Unlinks the record and hands it back to the caller.
    pub fn remove(&mut self, key: RecordKey) -> Option<AlarmRecord> {
        let pos = self.entries.iter().position(|(k, _)| *k == key)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (RecordKey, &AlarmRecord)> {
        self.entries.iter().map(|(k, r)| (*k, r))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Start record for a live alarm id, if any.
    pub fn find_start(&self, alarm_id: u32) -> Option<RecordKey> {
        self.entries
            .iter()
            .find(|(_, r)| r.kind == RequestKind::Start && r.alarm_id == alarm_id)
            .map(|(k, _)| *k)
    }

    /// Most recent Start record the starter has not claimed yet.
    pub fn latest_pending_start(&self) -> Option<RecordKey> {
        self.entries
            .iter()
            .filter(|(_, r)| r.kind == RequestKind::Start && r.status.state == AlarmState::Pending)
            .map(|(k, _)| *k)
            .last()
    }

    /// Most recent record of any of the given kinds.
    pub fn latest_of_kinds(&self, kinds: &[RequestKind]) -> Option<RecordKey> {
        self.entries
            .iter()
            .filter(|(_, r)| kinds.contains(&r.kind))
            .map(|(k, _)| *k)
            .last()
    }

    /// Start record for `alarm_id` admitted strictly before
    /// (`time_stamp`, `seq`).
    pub fn find_start_before(&self, alarm_id: u32, time_stamp: i64, seq: u64) -> Option<RecordKey> {
        self.entries
            .iter()
            .find(|(_, r)| {
                r.kind == RequestKind::Start
                    && r.alarm_id == alarm_id
                    && (r.time_stamp, r.seq) < (time_stamp, seq)
            })
            .map(|(k, _)| *k)
    }

    /// Unique group ids of Active/Suspended alarms, ascending.
    pub fn active_group_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self
            .entries
            .iter()
            .filter(|(_, r)| r.is_displayable())
            .map(|(_, r)| r.group_id)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Whether `group_id` is the largest active group (vacuously true with
    /// no active groups).
    pub fn is_largest_group(&self, group_id: u32) -> bool {
        match self.active_group_ids().last() {
            Some(largest) => *largest == group_id,
            None => true,
        }
    }
}

impl Default for AlarmList {
    fn default() -> Self {
        Self::new()
    }
}

/// The shared directory: the alarm list plus the dedicated change-request
/// list, both behind one reader/writer lock.
pub struct Tables {
    pub alarms: AlarmList,
    pub changes: AlarmList,
}

impl Tables {
    pub fn new() -> Self {
        Self {
            alarms: AlarmList::new(),
            changes: AlarmList::new(),
        }
    }
}

impl Default for Tables {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alarms::record::AlarmRecord;

    fn start_at(id: u32, group: u32, stamp: i64) -> AlarmRecord {
        let mut r = AlarmRecord::start(id, group, 5, 60, format!("alarm {id}"));
        r.time_stamp = stamp;
        r.expiry = stamp + 60;
        r
    }

    #[test]
    fn insert_keeps_timestamp_order() {
        let mut list = AlarmList::new();
        list.insert(start_at(1, 1, 100));
        list.insert(start_at(2, 1, 50));
        list.insert(start_at(3, 1, 75));

        let stamps: Vec<i64> = list.iter().map(|(_, r)| r.time_stamp).collect();
        assert_eq!(stamps, vec![50, 75, 100]);
    }

    #[test]
    fn equal_stamps_keep_admission_order() {
        let mut list = AlarmList::new();
        list.insert(start_at(1, 1, 100));
        list.insert(start_at(2, 1, 100));
        list.insert(start_at(3, 1, 100));

        let ids: Vec<u32> = list.iter().map(|(_, r)| r.alarm_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn keys_stay_stable_across_removals() {
        let mut list = AlarmList::new();
        let k1 = list.insert(start_at(1, 1, 10));
        let k2 = list.insert(start_at(2, 1, 20));

        assert!(list.remove(k1).is_some());
        assert!(list.get(k1).is_none());
        assert_eq!(list.get(k2).unwrap().alarm_id, 2);

        // A new record never resurrects an old key.
        let k3 = list.insert(start_at(3, 1, 30));
        assert_ne!(k3, k1);
    }

    #[test]
    fn latest_pending_start_prefers_most_recent() {
        let mut list = AlarmList::new();
        list.insert(start_at(1, 1, 100));
        let newest = list.insert(start_at(2, 1, 300));
        list.insert(start_at(3, 1, 200));

        assert_eq!(list.latest_pending_start(), Some(newest));

        list.get_mut(newest).unwrap().status.state = AlarmState::Active;
        let next = list.latest_pending_start().unwrap();
        assert_eq!(list.get(next).unwrap().alarm_id, 3);
    }

    #[test]
    fn latest_of_kinds_spans_both_kinds() {
        let mut list = AlarmList::new();
        let mut suspend = AlarmRecord::control(RequestKind::Suspend, 1);
        suspend.time_stamp = 10;
        list.insert(suspend);

        let mut reactivate = AlarmRecord::control(RequestKind::Reactivate, 1);
        reactivate.time_stamp = 20;
        let latest = list.insert(reactivate);

        assert_eq!(
            list.latest_of_kinds(&[RequestKind::Suspend, RequestKind::Reactivate]),
            Some(latest)
        );
    }

    #[test]
    fn find_start_before_is_strict() {
        let mut list = AlarmList::new();
        let start = list.insert(start_at(7, 1, 100));
        let (stamp, seq) = {
            let r = list.get(start).unwrap();
            (r.time_stamp, r.seq)
        };

        // The start itself is not "before" itself.
        assert_eq!(list.find_start_before(7, stamp, seq), None);
        assert_eq!(list.find_start_before(7, stamp, seq + 1), Some(start));
        assert_eq!(list.find_start_before(7, stamp + 1, 0), Some(start));
    }

    #[test]
    fn group_queries_see_only_displayable_records() {
        let mut list = AlarmList::new();
        let a = list.insert(start_at(1, 30, 10));
        let b = list.insert(start_at(2, 10, 20));
        let c = list.insert(start_at(3, 20, 30));
        list.insert(AlarmRecord::control(RequestKind::Cancel, 9));

        // Pending starts are not displayable yet.
        assert!(list.active_group_ids().is_empty());

        list.get_mut(a).unwrap().status.state = AlarmState::Active;
        list.get_mut(b).unwrap().status.state = AlarmState::Suspended;
        list.get_mut(c).unwrap().status.state = AlarmState::Active;

        assert_eq!(list.active_group_ids(), vec![10, 20, 30]);
        assert!(list.is_largest_group(30));
        assert!(!list.is_largest_group(10));

        list.get_mut(a).unwrap().status.state = AlarmState::Remove;
        assert_eq!(list.active_group_ids(), vec![10, 20]);
        assert!(list.is_largest_group(20));
    }
}
