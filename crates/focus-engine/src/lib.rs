//! # focus-engine
//!
//! Deterministic task auto-scheduler for time-blocked calendars.
//!
//! Given a prioritized task list and the busy blocks already on the calendar,
//! the engine finds free slots inside working hours, places tasks in priority
//! order, flags deadlines at risk, and proposes new focus blocks. It performs
//! no I/O and keeps no state between calls; callers fetch inputs and persist
//! the proposed blocks.
//!
//! ## Modules
//!
//! - [`model`] - `Task`, `FocusBlock` and their enums
//! - [`preferences`] - working hours, buffer, horizon, tuning
//! - [`slot`] - the `TimeSlot` value type
//! - [`conflict`] - Overlap checks between a proposed span and existing blocks
//! - [`availability`] - Free slots for a day and across the horizon
//! - [`priority`] - Scheduling order over tasks
//! - [`risk`] - Deadline risk against the free-slot pool
//! - [`heuristics`] - Keyword estimates for duration, priority and context
//! - [`engine`] - `auto_schedule` and `reschedule_on_calendar_change`
//! - [`error`] - Error types

pub mod availability;
pub mod conflict;
pub mod engine;
pub mod error;
pub mod heuristics;
pub mod model;
pub mod preferences;
pub mod priority;
pub mod risk;
pub mod slot;

pub use availability::{build_slot_pool, find_available_slots, find_available_slots_with_floor};
pub use conflict::{find_conflicts, overlaps, ConflictReport};
pub use engine::{
    auto_schedule, auto_schedule_at, reschedule_on_calendar_change,
    reschedule_on_calendar_change_at, AtRiskTask, ScheduleRequest, ScheduleSummary,
    ScheduledTask, SchedulerResult,
};
pub use error::SchedulerError;
pub use heuristics::{calculate_do_date, detect_context, estimate_duration, infer_priority_level};
pub use model::{BlockMetadata, FocusBlock, PriorityLevel, Task, TaskStatus};
pub use preferences::{SchedulerPreferences, SchedulerTuning, WorkingHours};
pub use priority::sort_tasks_for_scheduling;
pub use risk::{calculate_deadline_risk, DeadlineRisk, RiskLevel};
pub use slot::TimeSlot;
