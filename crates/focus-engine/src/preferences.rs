//! Scheduler preferences: working hours, buffers, horizon and tuning knobs.
//!
//! Every field has a serde default so a partial TOML/JSON document is a valid
//! configuration. [`SchedulerPreferences::validate`] is the fail-fast boundary
//! check run before the engine touches any input.

use chrono::NaiveTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulerError};

/// Smallest free gap worth proposing as a slot.
pub const DEFAULT_MIN_SLOT_MINUTES: i64 = 15;

/// Available time below `ratio × duration` flags a tight timeline.
pub const DEFAULT_TIGHT_TIMELINE_RATIO: f64 = 2.0;

/// Parse an `HH:MM` wall-clock time.
pub fn parse_hhmm(raw: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M").map_err(|_| SchedulerError::InvalidTime {
        value: raw.to_string(),
    })
}

mod hhmm {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_hhmm(&raw).map_err(de::Error::custom)
    }
}

/// The daily schedulable window, serialized as `"HH:MM"` strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

impl WorkingHours {
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Ok(Self {
            start: parse_hhmm(start)?,
            end: parse_hhmm(end)?,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.minutes() <= 0 {
            return Err(SchedulerError::InvalidWorkingHours(format!(
                "end {} is not after start {}",
                self.end.format("%H:%M"),
                self.start.format("%H:%M")
            )));
        }
        Ok(())
    }

    pub fn minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
            end: NaiveTime::from_hms_opt(17, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

/// Engine constants exposed for tuning. Defaults match long-standing behavior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerTuning {
    pub min_slot_minutes: i64,
    pub tight_timeline_ratio: f64,
}

impl Default for SchedulerTuning {
    fn default() -> Self {
        Self {
            min_slot_minutes: DEFAULT_MIN_SLOT_MINUTES,
            tight_timeline_ratio: DEFAULT_TIGHT_TIMELINE_RATIO,
        }
    }
}

impl SchedulerTuning {
    pub fn validate(&self) -> Result<()> {
        if self.min_slot_minutes < 1 {
            return Err(SchedulerError::InvalidTuning(format!(
                "min_slot_minutes must be at least 1, got {}",
                self.min_slot_minutes
            )));
        }
        if !self.tight_timeline_ratio.is_finite() || self.tight_timeline_ratio < 1.0 {
            return Err(SchedulerError::InvalidTuning(format!(
                "tight_timeline_ratio must be a finite value >= 1.0, got {}",
                self.tight_timeline_ratio
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerPreferences {
    pub working_hours: WorkingHours,
    /// Gap kept before and after every existing block.
    pub buffer_minutes: u32,
    /// Number of days, starting at the target date, searched for slots.
    pub scheduling_horizon_days: u32,
    /// Echoed back in the summary; never enforced.
    pub focus_time_goal_minutes: u32,
    /// IANA zone the working hours are expressed in.
    pub timezone: String,
    pub tuning: SchedulerTuning,
}

impl Default for SchedulerPreferences {
    fn default() -> Self {
        Self {
            working_hours: WorkingHours::default(),
            buffer_minutes: 10,
            scheduling_horizon_days: 14,
            focus_time_goal_minutes: 240,
            timezone: "UTC".to_string(),
            tuning: SchedulerTuning::default(),
        }
    }
}

impl SchedulerPreferences {
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse()
            .map_err(|_| SchedulerError::InvalidTimezone(self.timezone.clone()))
    }

    pub fn buffer_minutes(&self) -> i64 {
        i64::from(self.buffer_minutes)
    }

    /// Check everything the engine assumes about its configuration.
    ///
    /// # Errors
    /// Returns `SchedulerError::InvalidWorkingHours` if the window is empty or
    /// inverted, `SchedulerError::InvalidTimezone` for an unknown IANA zone, and
    /// `SchedulerError::InvalidTuning` for out-of-range tuning values.
    pub fn validate(&self) -> Result<()> {
        self.working_hours.validate()?;
        self.tz()?;
        self.tuning.validate()
    }
}
