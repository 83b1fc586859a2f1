//! Round-robin coordination across display groups.
//!
//! The cursor remembers the most recently displayed alarm id. A scheduler
//! asks [`Rotation::is_next`] before touching its slots; groups take turns
//! in ascending group-id order, and printing the largest group resets the
//! cursor so the next cycle starts at the smallest.
//!
//! ## Rules
//! - `is_next` and `note_displayed` are called under the table reader lock;
//!   the cursor mutex nests inside every other lock of the system.
//! - A cursor pointing at an alarm that left the table falls back to the
//!   smallest group.

use std::sync::Mutex;

use crate::alarms::AlarmList;

/// Shared round-robin cursor.
pub struct Rotation {
    cursor: Mutex<Option<u32>>,
}

impl Rotation {
    pub fn new() -> Self {
        Self {
            cursor: Mutex::new(None),
        }
    }

    /// Most recently displayed alarm id, if a cycle is in progress.
    pub fn cursor(&self) -> Option<u32> {
        *self.cursor.lock().expect("rotation mutex poisoned")
    }

    /// Whether `group_id` is the next group allowed to display.
    ///
    /// A group with no Active/Suspended alarms left is always allowed
    /// through: its scheduler only has hand-offs and removals to observe,
    /// and gating it would strand those slots forever.
    pub fn is_next(&self, group_id: u32, alarms: &AlarmList) -> bool {
        let groups = alarms.active_group_ids();
        if !groups.contains(&group_id) {
            return true;
        }
        if groups.len() == 1 {
            return groups[0] == group_id;
        }

        let last_group = self
            .cursor()
            .and_then(|id| alarms.find_start(id))
            .and_then(|key| alarms.get(key))
            .map(|r| r.group_id);

        match last_group.and_then(|g| groups.iter().position(|&x| x == g)) {
            // Cursor group is gone (or no cycle running): start at the smallest.
            None => group_id == groups[0],
            Some(idx) => group_id == groups[(idx + 1) % groups.len()],
        }
    }

    /// Records that `alarm_id` was just displayed; a display by the largest
    /// group closes the cycle.
    pub fn note_displayed(&self, alarm_id: u32, largest_group: bool) {
        let mut cursor = self.cursor.lock().expect("rotation mutex poisoned");
        *cursor = if largest_group { None } else { Some(alarm_id) };
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::new()
    }
}
