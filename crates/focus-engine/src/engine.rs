//! The auto-scheduling engine.
//!
//! One call is self-contained: the slot pool is built fresh from the existing
//! blocks, tasks are walked in priority order, and each placement carves its
//! span out of the pool. Nothing is persisted and no state survives the call.

use std::collections::HashSet;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::availability::build_slot_pool;
use crate::error::Result;
use crate::model::{FocusBlock, Task};
use crate::preferences::SchedulerPreferences;
use crate::priority::sort_tasks_for_scheduling;
use crate::risk::{calculate_deadline_risk_with_ratio, DeadlineRisk, RiskLevel};
use crate::slot::TimeSlot;

/// Everything one scheduling run needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub existing_blocks: Vec<FocusBlock>,
    #[serde(default)]
    pub preferences: SchedulerPreferences,
    /// First day of the horizon; defaults to today in the preference timezone.
    #[serde(default)]
    pub target_date: Option<NaiveDate>,
}

impl ScheduleRequest {
    pub fn new(tasks: Vec<Task>, existing_blocks: Vec<FocusBlock>) -> Self {
        Self {
            tasks,
            existing_blocks,
            preferences: SchedulerPreferences::default(),
            target_date: None,
        }
    }
}

/// A task together with the span and block the engine proposes for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledTask {
    pub task: Task,
    pub scheduled_start: DateTime<Utc>,
    pub scheduled_end: DateTime<Utc>,
    pub block: FocusBlock,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtRiskTask {
    pub task_id: String,
    pub task_name: String,
    pub level: RiskLevel,
    pub reason: String,
    pub available_minutes: i64,
    pub suggestion: String,
}

impl AtRiskTask {
    fn from_risk(task: &Task, risk: &DeadlineRisk) -> Self {
        Self {
            task_id: task.id.clone(),
            task_name: task.name.clone(),
            level: risk.level,
            reason: risk.reason.clone().unwrap_or_default(),
            available_minutes: risk.available_minutes,
            suggestion: risk.suggestion().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub total_scheduled: usize,
    pub total_unscheduled: usize,
    pub total_at_risk: usize,
    pub total_minutes_scheduled: i64,
    /// Passed through from preferences; informational.
    pub focus_time_goal_minutes: u32,
    pub focus_goal_met: bool,
}

/// Output of one engine run. `created_blocks` are proposals the caller must
/// persist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerResult {
    pub scheduled_tasks: Vec<ScheduledTask>,
    pub unscheduled_tasks: Vec<Task>,
    pub at_risk_tasks: Vec<AtRiskTask>,
    pub created_blocks: Vec<FocusBlock>,
    pub summary: ScheduleSummary,
}

impl SchedulerResult {
    /// `(task id, block id)` pairs to write back as `scheduled_block_id`.
    pub fn task_bindings(&self) -> impl Iterator<Item = (&str, &str)> {
        self.scheduled_tasks
            .iter()
            .map(|s| (s.task.id.as_str(), s.block.id.as_str()))
    }
}

/// Schedule `request` against the system clock.
///
/// See [`auto_schedule_at`].
pub fn auto_schedule(request: &ScheduleRequest) -> Result<SchedulerResult> {
    auto_schedule_at(request, Utc::now())
}

/// Place the schedulable tasks of `request` into free slots, treating `now`
/// as the current instant.
///
/// Tasks that are done, opted out, or already bound to a block are skipped.
/// The rest are walked in [`sort_tasks_for_scheduling`] order; each is risk
/// checked against the remaining pool, then given the best slot (see
/// [`select_slot`]). Placing a task removes its slot and re-inserts any
/// leftover of at least the minimum slot size, so several tasks can share one
/// large gap.
///
/// # Errors
/// Only invalid preferences are errors (see [`SchedulerPreferences::validate`]).
/// A task with no fitting slot in the horizon lands in `unscheduled_tasks`.
pub fn auto_schedule_at(request: &ScheduleRequest, now: DateTime<Utc>) -> Result<SchedulerResult> {
    let preferences = &request.preferences;
    preferences.validate()?;
    let tz = preferences.tz()?;
    let min_slot = preferences.tuning.min_slot_minutes;

    let target_date = request
        .target_date
        .unwrap_or_else(|| now.with_timezone(&tz).date_naive());

    let candidates: Vec<Task> = request
        .tasks
        .iter()
        .filter(|t| t.is_schedulable())
        .cloned()
        .collect();
    let ordered = sort_tasks_for_scheduling(&candidates);

    let mut pool = build_slot_pool(&request.existing_blocks, preferences, &tz, target_date, now);
    debug!(
        %target_date,
        candidates = ordered.len(),
        slots = pool.len(),
        "built slot pool"
    );

    let mut scheduled_tasks = Vec::new();
    let mut unscheduled_tasks = Vec::new();
    let mut at_risk_tasks = Vec::new();
    let mut created_blocks = Vec::new();

    for task in ordered {
        let needed = task.effective_duration_minutes();

        let risk = calculate_deadline_risk_with_ratio(
            &task,
            &pool,
            now,
            preferences.tuning.tight_timeline_ratio,
        );
        if risk.at_risk {
            debug!(
                task_id = %task.id,
                level = ?risk.level,
                available_minutes = risk.available_minutes,
                "task at risk"
            );
            at_risk_tasks.push(AtRiskTask::from_risk(&task, &risk));
        }

        let Some(index) = select_slot(&pool, needed, task.preferred_date(), &tz) else {
            debug!(task_id = %task.id, needed, "no slot fits within horizon");
            unscheduled_tasks.push(task);
            continue;
        };

        let slot = pool.remove(index);
        let scheduled_start = slot.start;
        let scheduled_end = scheduled_start + Duration::minutes(needed);
        for rest in slot.remainders(scheduled_start, scheduled_end, min_slot) {
            insert_sorted(&mut pool, rest);
        }

        let block = FocusBlock::for_task(&task, scheduled_start, scheduled_end);
        debug!(
            task_id = %task.id,
            start = %scheduled_start,
            end = %scheduled_end,
            "task placed"
        );
        created_blocks.push(block.clone());
        scheduled_tasks.push(ScheduledTask {
            task,
            scheduled_start,
            scheduled_end,
            block,
        });
    }

    let total_minutes_scheduled: i64 = scheduled_tasks
        .iter()
        .map(|s| s.block.duration_minutes())
        .sum();
    let summary = ScheduleSummary {
        total_scheduled: scheduled_tasks.len(),
        total_unscheduled: unscheduled_tasks.len(),
        total_at_risk: at_risk_tasks.len(),
        total_minutes_scheduled,
        focus_time_goal_minutes: preferences.focus_time_goal_minutes,
        focus_goal_met: total_minutes_scheduled >= i64::from(preferences.focus_time_goal_minutes),
    };

    info!(
        scheduled = summary.total_scheduled,
        unscheduled = summary.total_unscheduled,
        at_risk = summary.total_at_risk,
        minutes = summary.total_minutes_scheduled,
        "auto-schedule complete"
    );

    Ok(SchedulerResult {
        scheduled_tasks,
        unscheduled_tasks,
        at_risk_tasks,
        created_blocks,
        summary,
    })
}

/// Pick the slot for a task needing `needed` minutes.
///
/// With a preferred date that has room, the smallest sufficient slot on that
/// date wins (earliest on ties). Otherwise the earliest sufficient slot in the
/// pool wins. The pool must be sorted by start.
pub fn select_slot(
    pool: &[TimeSlot],
    needed: i64,
    preferred_date: Option<NaiveDate>,
    tz: &Tz,
) -> Option<usize> {
    if let Some(date) = preferred_date {
        let best_fit = pool
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.fits(needed) && slot.local_date(tz) == date)
            .min_by_key(|(_, slot)| (slot.duration_minutes, slot.start))
            .map(|(index, _)| index);
        if best_fit.is_some() {
            return best_fit;
        }
    }
    pool.iter().position(|slot| slot.fits(needed))
}

fn insert_sorted(pool: &mut Vec<TimeSlot>, slot: TimeSlot) {
    let at = pool.partition_point(|s| s.start <= slot.start);
    pool.insert(at, slot);
}

/// Reschedule against the system clock.
///
/// See [`reschedule_on_calendar_change_at`].
pub fn reschedule_on_calendar_change(
    affected_tasks: &[Task],
    new_blocks: &[FocusBlock],
    removed_block_ids: &[String],
    preferences: &SchedulerPreferences,
) -> Result<SchedulerResult> {
    reschedule_on_calendar_change_at(
        affected_tasks,
        new_blocks,
        removed_block_ids,
        preferences,
        Utc::now(),
    )
}

/// Re-run the engine after calendar blocks were added or removed.
///
/// Tasks bound to a removed block lose their binding; removed blocks are
/// dropped from `new_blocks`; then a full [`auto_schedule_at`] runs over the
/// affected tasks. The caller merges the result back into its task set.
pub fn reschedule_on_calendar_change_at(
    affected_tasks: &[Task],
    new_blocks: &[FocusBlock],
    removed_block_ids: &[String],
    preferences: &SchedulerPreferences,
    now: DateTime<Utc>,
) -> Result<SchedulerResult> {
    let removed: HashSet<&str> = removed_block_ids.iter().map(String::as_str).collect();

    let mut cleared = 0usize;
    let tasks: Vec<Task> = affected_tasks
        .iter()
        .cloned()
        .map(|mut task| {
            if task
                .scheduled_block_id
                .as_deref()
                .is_some_and(|id| removed.contains(id))
            {
                task.scheduled_block_id = None;
                cleared += 1;
            }
            task
        })
        .collect();

    let existing_blocks: Vec<FocusBlock> = new_blocks
        .iter()
        .filter(|b| !removed.contains(b.id.as_str()))
        .cloned()
        .collect();

    info!(
        tasks = tasks.len(),
        cleared_bindings = cleared,
        removed_blocks = removed.len(),
        "rescheduling after calendar change"
    );

    let request = ScheduleRequest {
        tasks,
        existing_blocks,
        preferences: preferences.clone(),
        target_date: None,
    };
    auto_schedule_at(&request, now)
}
