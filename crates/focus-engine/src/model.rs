//! Task and calendar-block records consumed and produced by the engine.
//!
//! Both types are owned by the surrounding application. The engine reads
//! tasks and existing blocks, and emits new blocks for the caller to persist.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// `metadata.source` stamped on every block the engine creates.
pub const AUTO_SCHEDULER_SOURCE: &str = "auto-scheduler";

/// Context given to created blocks when the task carries none.
pub const DEFAULT_CONTEXT: &str = "house";

/// Effort assumed for a task with no estimate.
pub const DEFAULT_DURATION_MINUTES: u32 = 30;

/// Coarse urgency tier. `P1` must happen today, `P4` is low value.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PriorityLevel {
    P1,
    P2,
    #[default]
    P3,
    P4,
}

impl PriorityLevel {
    /// Sort weight; higher schedules first.
    pub fn weight(self) -> u32 {
        match self {
            PriorityLevel::P1 => 100,
            PriorityLevel::P2 => 75,
            PriorityLevel::P3 => 50,
            PriorityLevel::P4 => 25,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PriorityLevel::P1 => "p1",
            PriorityLevel::P2 => "p2",
            PriorityLevel::P3 => "p3",
            PriorityLevel::P4 => "p4",
        }
    }
}

impl fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

fn default_true() -> bool {
    true
}

/// A unit of work the engine may place on the calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Missing means [`PriorityLevel::P3`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_level: Option<PriorityLevel>,
    /// Missing means [`DEFAULT_DURATION_MINUTES`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub do_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committed_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default = "default_true")]
    pub auto_schedule: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_block_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl Task {
    /// A `todo` task with every optional field unset.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            priority_level: None,
            duration_minutes: None,
            due_date: None,
            do_date: None,
            committed_date: None,
            status: TaskStatus::Todo,
            auto_schedule: true,
            scheduled_block_id: None,
            context: None,
        }
    }

    pub fn priority(&self) -> PriorityLevel {
        self.priority_level.unwrap_or_default()
    }

    /// Minutes to reserve. A missing or zero duration falls back to
    /// [`DEFAULT_DURATION_MINUTES`].
    pub fn effective_duration_minutes(&self) -> i64 {
        let minutes = match self.duration_minutes {
            Some(0) | None => DEFAULT_DURATION_MINUTES,
            Some(minutes) => minutes,
        };
        i64::from(minutes)
    }

    /// The date the task would like to be worked on. `do_date` wins over
    /// `committed_date`.
    pub fn preferred_date(&self) -> Option<NaiveDate> {
        self.do_date.or(self.committed_date)
    }

    /// Eligible for the engine: opted in, not done, not already bound to a block.
    pub fn is_schedulable(&self) -> bool {
        self.auto_schedule && self.status != TaskStatus::Done && self.scheduled_block_id.is_none()
    }
}

/// Provenance attached to engine-created blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockMetadata {
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
}

/// A calendar entry representing busy time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusBlock {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub context: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BlockMetadata>,
}

impl FocusBlock {
    pub fn new(id: impl Into<String>, start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            start_time,
            end_time,
            context: String::new(),
            metadata: None,
        }
    }

    /// Synthesize the block that binds `task` to `[start, end)`.
    pub fn for_task(task: &Task, start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Self {
            id: format!("auto-{}", task.id),
            title: task.name.clone(),
            start_time,
            end_time,
            context: task
                .context
                .clone()
                .unwrap_or_else(|| DEFAULT_CONTEXT.to_string()),
            metadata: Some(BlockMetadata {
                source: AUTO_SCHEDULER_SOURCE.to_string(),
                task_id: Some(task.id.clone()),
            }),
        }
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }
}
