//! The time-slot value type: a contiguous span of free time.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A free time slot. `start < end` for every slot the engine produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_minutes: i64,
}

impl TimeSlot {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            duration_minutes: (end - start).num_minutes(),
        }
    }

    /// Build `[start, end)` only if it lasts at least `min_minutes`.
    pub fn at_least(start: DateTime<Utc>, end: DateTime<Utc>, min_minutes: i64) -> Option<Self> {
        if start >= end {
            return None;
        }
        let slot = Self::new(start, end);
        (slot.duration_minutes >= min_minutes).then_some(slot)
    }

    pub fn fits(&self, minutes: i64) -> bool {
        self.duration_minutes >= minutes
    }

    /// Move the start forward to `earliest`, dropping the slot if what is left
    /// is shorter than `min_minutes`.
    pub fn clip_start(&self, earliest: DateTime<Utc>, min_minutes: i64) -> Option<Self> {
        if earliest <= self.start {
            return Some(self.clone());
        }
        Self::at_least(earliest, self.end, min_minutes)
    }

    /// The leftovers once `[start, end)` is carved out of this slot.
    ///
    /// Returns up to two slots (before, after); each is kept only when it is at
    /// least `min_minutes` long.
    pub fn remainders(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        min_minutes: i64,
    ) -> Vec<TimeSlot> {
        [
            Self::at_least(self.start, start.min(self.end), min_minutes),
            Self::at_least(end.max(self.start), self.end, min_minutes),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Calendar date of the slot start as seen in `tz`.
    pub fn local_date<Tz: TimeZone>(&self, tz: &Tz) -> NaiveDate {
        self.start.with_timezone(tz).date_naive()
    }
}
