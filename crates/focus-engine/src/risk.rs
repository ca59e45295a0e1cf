//! Deadline risk against the current free-slot pool.
//!
//! Risk is a pure function of the slots still free, so during one engine run
//! the assessment tightens as earlier tasks consume capacity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Task;
use crate::preferences::DEFAULT_TIGHT_TIMELINE_RATIO;
use crate::slot::TimeSlot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// No deadline, or comfortably more free time than needed.
    OnTrack,
    /// Fits, but with less margin than the tight-timeline ratio.
    Tight,
    /// Not enough free time before the deadline.
    Insufficient,
    /// The deadline is at or before `now`.
    Overdue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeadlineRisk {
    pub level: RiskLevel,
    pub at_risk: bool,
    pub reason: Option<String>,
    /// Free minutes in slots ending at or before the deadline.
    pub available_minutes: i64,
    /// Minutes missing to fit the task; 0 unless `Insufficient` or `Overdue`.
    pub shortfall_minutes: i64,
}

impl DeadlineRisk {
    fn on_track(available_minutes: i64) -> Self {
        Self {
            level: RiskLevel::OnTrack,
            at_risk: false,
            reason: None,
            available_minutes,
            shortfall_minutes: 0,
        }
    }

    /// Shortfall rounded up to whole hours.
    pub fn shortfall_hours(&self) -> i64 {
        (self.shortfall_minutes + 59) / 60
    }

    /// What the user could do about it, if anything.
    pub fn suggestion(&self) -> Option<String> {
        match self.level {
            RiskLevel::OnTrack => None,
            RiskLevel::Insufficient | RiskLevel::Overdue => Some(format!(
                "Free up {} hour(s) before the deadline or move the due date",
                self.shortfall_hours()
            )),
            RiskLevel::Tight => {
                Some("Schedule soon; a single delay would consume the margin".to_string())
            }
        }
    }
}

/// Assess `task` against `available_slots` using the default 2x tight ratio.
pub fn calculate_deadline_risk(
    task: &Task,
    available_slots: &[TimeSlot],
    now: DateTime<Utc>,
) -> DeadlineRisk {
    calculate_deadline_risk_with_ratio(task, available_slots, now, DEFAULT_TIGHT_TIMELINE_RATIO)
}

/// Assess `task` against `available_slots`.
///
/// - No due date: never at risk.
/// - Due at or before `now`: overdue.
/// - Fewer free minutes before the deadline than the task needs: insufficient.
/// - Fewer than `tight_ratio × duration`: tight, even though it fits.
pub fn calculate_deadline_risk_with_ratio(
    task: &Task,
    available_slots: &[TimeSlot],
    now: DateTime<Utc>,
    tight_ratio: f64,
) -> DeadlineRisk {
    let Some(due) = task.due_date else {
        return DeadlineRisk::on_track(0);
    };
    let needed = task.effective_duration_minutes();

    if due <= now {
        return DeadlineRisk {
            level: RiskLevel::Overdue,
            at_risk: true,
            reason: Some("Deadline has already passed".to_string()),
            available_minutes: 0,
            shortfall_minutes: needed,
        };
    }

    let available_minutes: i64 = available_slots
        .iter()
        .filter(|slot| slot.end <= due)
        .map(|slot| slot.duration_minutes)
        .sum();

    if available_minutes < needed {
        let risk = DeadlineRisk {
            level: RiskLevel::Insufficient,
            at_risk: true,
            reason: None,
            available_minutes,
            shortfall_minutes: needed - available_minutes,
        };
        let reason = format!(
            "Only {} min free before the deadline but {} min needed ({} hour(s) short)",
            available_minutes,
            needed,
            risk.shortfall_hours()
        );
        return DeadlineRisk {
            reason: Some(reason),
            ..risk
        };
    }

    if (available_minutes as f64) < tight_ratio * needed as f64 {
        let ratio = available_minutes as f64 / needed as f64;
        return DeadlineRisk {
            level: RiskLevel::Tight,
            at_risk: true,
            reason: Some(format!(
                "Tight timeline: only {:.1}x the required time is free before the deadline",
                ratio
            )),
            available_minutes,
            shortfall_minutes: 0,
        };
    }

    DeadlineRisk::on_track(available_minutes)
}
