//! Keyword heuristics for tasks that arrive without estimates.
//!
//! Every table here is static and checked in order; the first match wins.
//! Matching is a case-insensitive substring test.

use chrono::{Days, NaiveDate};

use crate::model::{PriorityLevel, DEFAULT_CONTEXT, DEFAULT_DURATION_MINUTES};

const DURATION_KEYWORDS: &[(&str, u32)] = &[
    ("call", 30),
    ("meeting", 60),
    ("review", 45),
    ("write", 90),
    ("email", 15),
    ("research", 120),
    ("planning", 60),
];

const URGENCY_KEYWORDS: &[&str] = &["urgent", "asap", "critical", "emergency"];

const HIGH_STAKES_KEYWORDS: &[&str] = &["investor", "funding", "contract", "deadline"];

const CONTEXT_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "fundraising",
        &["investor", "funding", "pitch", "raise", "term sheet", "vc"],
    ),
    (
        "sales",
        &["client", "customer", "deal", "proposal", "lead", "demo"],
    ),
    (
        "product",
        &["feature", "bug", "release", "deploy", "roadmap", "design"],
    ),
    (
        "marketing",
        &["campaign", "newsletter", "blog", "social", "launch", "content"],
    ),
    (
        "operations",
        &["invoice", "payroll", "contract", "legal", "hiring", "tax"],
    ),
];

const CONTEXT_PRIORITY_HINTS: &[(&str, PriorityLevel)] = &[
    ("fundraising", PriorityLevel::P1),
    ("sales", PriorityLevel::P2),
    ("product", PriorityLevel::P2),
    ("operations", PriorityLevel::P3),
    ("marketing", PriorityLevel::P3),
    ("house", PriorityLevel::P4),
];

fn haystack(name: &str, description: Option<&str>) -> String {
    match description {
        Some(desc) => format!("{} {}", name, desc).to_lowercase(),
        None => name.to_lowercase(),
    }
}

/// Guess how many minutes a task takes.
///
/// Duration keywords first; otherwise longer write-ups suggest longer work
/// (more than 20 words: 60 min, more than 10: 45 min, else 30 min).
pub fn estimate_duration(name: &str, description: Option<&str>) -> u32 {
    let text = haystack(name, description);

    if let Some((_, minutes)) = DURATION_KEYWORDS.iter().find(|(kw, _)| text.contains(kw)) {
        return *minutes;
    }

    match text.split_whitespace().count() {
        n if n > 20 => 60,
        n if n > 10 => 45,
        _ => DEFAULT_DURATION_MINUTES,
    }
}

/// Guess a priority tier from the task name, its context and due date.
pub fn infer_priority_level(
    name: &str,
    context: Option<&str>,
    due_date: Option<NaiveDate>,
    today: NaiveDate,
) -> PriorityLevel {
    let text = name.to_lowercase();
    if URGENCY_KEYWORDS
        .iter()
        .chain(HIGH_STAKES_KEYWORDS)
        .any(|kw| text.contains(kw))
    {
        return PriorityLevel::P1;
    }

    if let Some(due) = due_date {
        if due <= today {
            return PriorityLevel::P1;
        }
        if today.checked_add_days(Days::new(1)) == Some(due) {
            return PriorityLevel::P2;
        }
    }

    context
        .map(str::to_lowercase)
        .and_then(|ctx| {
            CONTEXT_PRIORITY_HINTS
                .iter()
                .find(|(name, _)| *name == ctx)
                .map(|(_, level)| *level)
        })
        .unwrap_or_default()
}

/// Pick the first category whose keyword list matches, else [`DEFAULT_CONTEXT`].
pub fn detect_context(name: &str, description: Option<&str>) -> &'static str {
    let text = haystack(name, description);
    CONTEXT_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| text.contains(kw)))
        .map(|(context, _)| *context)
        .unwrap_or(DEFAULT_CONTEXT)
}

/// Back-calculate the date to start work so the task lands before `due_date`.
///
/// Tasks of 120+ minutes start 2 days ahead, 60+ minutes 1 day ahead, shorter
/// ones on the due date; the lead time is never below `buffer_days`. The
/// result is never earlier than `today`.
pub fn calculate_do_date(
    due_date: NaiveDate,
    duration_minutes: u32,
    buffer_days: u32,
    today: NaiveDate,
) -> NaiveDate {
    let lead_days = match duration_minutes {
        d if d >= 120 => 2,
        d if d >= 60 => 1,
        _ => 0,
    }
    .max(buffer_days);

    due_date
        .checked_sub_days(Days::new(u64::from(lead_days)))
        .unwrap_or(due_date)
        .max(today)
}
