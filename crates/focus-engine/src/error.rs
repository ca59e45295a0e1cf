//! Error types for focus-engine operations.
//!
//! Only malformed caller input is an error. A task that cannot be placed is a
//! normal outcome reported through `SchedulerResult::unscheduled_tasks`.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchedulerError {
    #[error("Invalid working hours: {0}")]
    InvalidWorkingHours(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid time of day '{value}': expected HH:MM")]
    InvalidTime { value: String },

    #[error("Invalid tuning: {0}")]
    InvalidTuning(String),
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
