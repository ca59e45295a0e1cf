//! Scheduling order over tasks.
//!
//! The order doubles as a greedy bin-packing heuristic: among equally urgent
//! tasks, shorter ones go first so they can fill leftover gaps.

use std::cmp::Ordering;

use crate::model::Task;

/// Compare two tasks for scheduling order.
///
/// 1. Priority weight, descending (missing level counts as p3).
/// 2. Due date, ascending; no due date sorts last.
/// 3. Duration, ascending.
pub fn compare_for_scheduling(a: &Task, b: &Task) -> Ordering {
    b.priority()
        .weight()
        .cmp(&a.priority().weight())
        .then_with(|| match (a.due_date, b.due_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| {
            a.effective_duration_minutes()
                .cmp(&b.effective_duration_minutes())
        })
}

/// Return `tasks` in scheduling order. The sort is stable, so fully tied
/// tasks keep their input order.
pub fn sort_tasks_for_scheduling(tasks: &[Task]) -> Vec<Task> {
    let mut sorted = tasks.to_vec();
    sorted.sort_by(compare_for_scheduling);
    sorted
}
