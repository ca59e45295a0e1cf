//! Free-slot computation for working days.
//!
//! For a single day, working hours are applied in the preference timezone and
//! the existing blocks (padded by the buffer on both sides) are subtracted
//! from that window. Gaps shorter than the minimum useful slot are dropped so
//! the day is not fragmented into unusable shards.
//!
//! [`build_slot_pool`] repeats this over the scheduling horizon to produce the
//! engine's working slot pool.

use chrono::{DateTime, Days, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::model::FocusBlock;
use crate::preferences::{SchedulerPreferences, WorkingHours, DEFAULT_MIN_SLOT_MINUTES};
use crate::slot::TimeSlot;

/// Resolve a local wall-clock time on `date` to UTC.
///
/// Ambiguous times (DST fall-back) take the earlier instant. Times inside a
/// DST gap are shifted forward one hour.
fn local_instant(date: NaiveDate, time: NaiveTime, tz: &Tz) -> DateTime<Utc> {
    let naive = date.and_time(time);
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => tz
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| Utc.from_utc_datetime(&naive)),
    }
}

/// The UTC bounds of the working window on `date`.
pub fn day_window(date: NaiveDate, hours: &WorkingHours, tz: &Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    (
        local_instant(date, hours.start, tz),
        local_instant(date, hours.end, tz),
    )
}

/// Free slots on `date` using the default 15-minute minimum slot.
///
/// See [`find_available_slots_with_floor`].
pub fn find_available_slots(
    date: NaiveDate,
    existing_blocks: &[FocusBlock],
    hours: &WorkingHours,
    buffer_minutes: i64,
    tz: &Tz,
) -> Vec<TimeSlot> {
    find_available_slots_with_floor(
        date,
        existing_blocks,
        hours,
        buffer_minutes,
        tz,
        DEFAULT_MIN_SLOT_MINUTES,
    )
}

/// Free slots on `date`, sorted by start.
///
/// A block takes part when its buffered span `[start - buffer, end + buffer)`
/// touches the working window. Walking blocks in start order with a cursor at
/// the window start, the gap before each buffered block becomes a slot when
/// it lasts at least `min_slot_minutes`, then the cursor jumps past the
/// buffered block end. The cursor never moves backwards, so overlapping
/// blocks are handled as one busy span.
///
/// With no blocks on the day, the whole working window is returned as a single
/// slot.
pub fn find_available_slots_with_floor(
    date: NaiveDate,
    existing_blocks: &[FocusBlock],
    hours: &WorkingHours,
    buffer_minutes: i64,
    tz: &Tz,
    min_slot_minutes: i64,
) -> Vec<TimeSlot> {
    let (day_start, day_end) = day_window(date, hours, tz);
    if day_start >= day_end {
        return Vec::new();
    }

    let buffer = Duration::minutes(buffer_minutes);
    let mut day_blocks: Vec<&FocusBlock> = existing_blocks
        .iter()
        .filter(|b| b.start_time - buffer < day_end && b.end_time + buffer > day_start)
        .collect();

    if day_blocks.is_empty() {
        return vec![TimeSlot::new(day_start, day_end)];
    }

    day_blocks.sort_by_key(|b| (b.start_time, b.end_time));

    let mut slots = Vec::new();
    let mut cursor = day_start;

    for block in day_blocks {
        let busy_from = block.start_time - buffer;
        if busy_from > cursor {
            if let Some(slot) = TimeSlot::at_least(cursor, busy_from.min(day_end), min_slot_minutes) {
                slots.push(slot);
            }
        }
        cursor = cursor.max(block.end_time + buffer);
    }

    if cursor < day_end {
        if let Some(slot) = TimeSlot::at_least(cursor, day_end, min_slot_minutes) {
            slots.push(slot);
        }
    }

    slots
}

/// Build the slot pool for `[target_date, target_date + horizon)`.
///
/// Slots are clipped so none starts before `now`; anything left shorter than
/// the minimum slot is dropped. The pool is sorted by start.
pub fn build_slot_pool(
    existing_blocks: &[FocusBlock],
    preferences: &SchedulerPreferences,
    tz: &Tz,
    target_date: NaiveDate,
    now: DateTime<Utc>,
) -> Vec<TimeSlot> {
    let min_slot = preferences.tuning.min_slot_minutes;
    let mut pool = Vec::new();

    for offset in 0..preferences.scheduling_horizon_days {
        let Some(date) = target_date.checked_add_days(Days::new(u64::from(offset))) else {
            break;
        };
        let day = find_available_slots_with_floor(
            date,
            existing_blocks,
            &preferences.working_hours,
            preferences.buffer_minutes(),
            tz,
            min_slot,
        );
        pool.extend(day.iter().filter_map(|slot| slot.clip_start(now, min_slot)));
    }

    pool.sort_by_key(|s| s.start);
    pool
}
