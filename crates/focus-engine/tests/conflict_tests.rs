//! Tests for conflict detection against existing focus blocks.

use chrono::{DateTime, TimeZone, Utc};
use focus_engine::{find_conflicts, overlaps, FocusBlock};

fn at(hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 16, hour, min, 0).unwrap()
}

/// Helper to create a block from hour ranges on 2026-03-16.
fn block(id: &str, start_hour: u32, start_min: u32, end_hour: u32, end_min: u32) -> FocusBlock {
    FocusBlock::new(id, at(start_hour, start_min), at(end_hour, end_min))
}

#[test]
fn overlapping_spans_detected() {
    assert!(overlaps(at(9, 0), at(10, 0), at(9, 30), at(10, 30)));
    assert!(overlaps(at(9, 30), at(10, 30), at(9, 0), at(10, 0)));
}

#[test]
fn touching_endpoints_do_not_overlap() {
    assert!(!overlaps(at(9, 0), at(10, 0), at(10, 0), at(11, 0)));
    assert!(!overlaps(at(10, 0), at(11, 0), at(9, 0), at(10, 0)));
}

#[test]
fn contained_span_overlaps() {
    assert!(overlaps(at(9, 0), at(12, 0), at(10, 0), at(11, 0)));
}

#[test]
fn proposed_span_reports_conflicting_blocks() {
    let existing = vec![
        block("standup", 9, 0, 9, 30),
        block("lunch", 12, 0, 13, 0),
        block("review", 14, 0, 15, 0),
    ];

    let report = find_conflicts(at(11, 30), at(14, 30), &existing);

    assert!(report.has_conflict);
    let ids: Vec<&str> = report.conflicting_blocks.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec!["lunch", "review"]);
    // 60 min with lunch + 30 min with review
    assert_eq!(report.total_overlap_minutes, 90);
}

#[test]
fn adjacent_proposal_has_no_conflict() {
    let existing = vec![block("standup", 9, 0, 10, 0)];

    let report = find_conflicts(at(10, 0), at(11, 0), &existing);

    assert!(!report.has_conflict, "end == start should not conflict");
    assert!(report.conflicting_blocks.is_empty());
    assert_eq!(report.total_overlap_minutes, 0);
}

#[test]
fn empty_calendar_has_no_conflict() {
    let report = find_conflicts(at(9, 0), at(17, 0), &[]);
    assert!(!report.has_conflict);
}
