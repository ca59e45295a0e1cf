//! Detect overlap between a proposed span and existing calendar blocks.
//!
//! Spans are half-open: a block ending exactly when another starts is NOT a
//! conflict. Used for interactive conflict warnings; the auto-scheduling loop
//! works from free slots instead.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::FocusBlock;

/// Result of checking a proposed span against the calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictReport {
    pub has_conflict: bool,
    pub conflicting_blocks: Vec<FocusBlock>,
    /// Sum of per-block overlap with the proposed span.
    pub total_overlap_minutes: i64,
}

/// Two intervals overlap iff `start_a < end_b && start_b < end_a`.
pub fn overlaps(
    start_a: DateTime<Utc>,
    end_a: DateTime<Utc>,
    start_b: DateTime<Utc>,
    end_b: DateTime<Utc>,
) -> bool {
    start_a < end_b && start_b < end_a
}

/// Minutes shared by two intervals, 0 when they do not overlap.
pub fn overlap_minutes(
    start_a: DateTime<Utc>,
    end_a: DateTime<Utc>,
    start_b: DateTime<Utc>,
    end_b: DateTime<Utc>,
) -> i64 {
    if !overlaps(start_a, end_a, start_b, end_b) {
        return 0;
    }
    (end_a.min(end_b) - start_a.max(start_b)).num_minutes()
}

/// Find every existing block overlapping `[proposed_start, proposed_end)`.
///
/// Blocks are returned in input order.
pub fn find_conflicts(
    proposed_start: DateTime<Utc>,
    proposed_end: DateTime<Utc>,
    existing_blocks: &[FocusBlock],
) -> ConflictReport {
    let conflicting_blocks: Vec<FocusBlock> = existing_blocks
        .iter()
        .filter(|b| overlaps(proposed_start, proposed_end, b.start_time, b.end_time))
        .cloned()
        .collect();

    let total_overlap_minutes = conflicting_blocks
        .iter()
        .map(|b| overlap_minutes(proposed_start, proposed_end, b.start_time, b.end_time))
        .sum();

    ConflictReport {
        has_conflict: !conflicting_blocks.is_empty(),
        conflicting_blocks,
        total_overlap_minutes,
    }
}
