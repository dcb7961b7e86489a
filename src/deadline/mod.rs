//! Deadline urgency engine.
//!
//! Maps a task's deadline and completion flag to an urgency status, a
//! relative-time label and a progress bar. Every function takes "now" as a
//! parameter and holds no state: identical inputs give identical outputs.

pub mod label;
pub mod progress;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

use crate::clock::Zone;

pub use label::{relative_label, relative_label_str, Distance, RelativeFormatter, Tense};
pub use progress::{progress, ColorToken, ProgressBar, ProgressInput, ProgressPolicy};

pub const LABEL_DONE: &str = "Concluída";
pub const LABEL_OVERDUE: &str = "Atrasado";
pub const LABEL_CRITICAL: &str = "Crítico";
pub const LABEL_URGENT: &str = "Urgente";

/// Below this many hours left a task is critical.
pub const CRITICAL_HOURS: f64 = 24.0;
/// Below this many hours left a task is urgent.
pub const URGENT_HOURS: f64 = 48.0;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyStatus {
    Ok,
    Urgent,
    Critical,
    Done,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct UrgencyResult {
    /// `None` when the task has no deadline.
    pub status: Option<UrgencyStatus>,
    pub label: Option<&'static str>,
    /// Whole hours until the deadline, truncated toward zero. Infinite when
    /// there is nothing left to count down.
    pub hours_remaining: f64,
}

impl UrgencyResult {
    fn unscheduled() -> Self {
        UrgencyResult { status: None, label: None, hours_remaining: f64::INFINITY }
    }

    fn done() -> Self {
        UrgencyResult {
            status: Some(UrgencyStatus::Done),
            label: Some(LABEL_DONE),
            hours_remaining: f64::INFINITY,
        }
    }

    pub fn is_overdue(&self) -> bool {
        self.label == Some(LABEL_OVERDUE)
    }

    /// Alert badge for urgent and critical tasks.
    pub fn badge(&self) -> Option<Badge> {
        match self.status? {
            UrgencyStatus::Critical => Some(Badge {
                label: if self.is_overdue() || self.hours_remaining < 0.0 {
                    LABEL_OVERDUE
                } else {
                    LABEL_CRITICAL
                },
                tone: BadgeTone::Danger,
                pulse: true,
            }),
            UrgencyStatus::Urgent => Some(Badge {
                label: LABEL_URGENT,
                tone: BadgeTone::Warning,
                pulse: false,
            }),
            UrgencyStatus::Ok | UrgencyStatus::Done => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    Warning,
    Danger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    pub label: &'static str,
    pub tone: BadgeTone,
    /// Critical badges blink in the UI.
    pub pulse: bool,
}

/// Whole hours from `from` to `to`, truncated toward zero.
pub fn hours_between(to: DateTime<Utc>, from: DateTime<Utc>) -> f64 {
    (to - from).num_hours() as f64
}

/// Classifies how close a task is to its deadline.
///
/// Completion wins over everything else, including a missing or past
/// deadline.
pub fn classify(deadline: Option<DateTime<Utc>>, completed: bool, now: DateTime<Utc>) -> UrgencyResult {
    if completed {
        return UrgencyResult::done();
    }
    let Some(deadline) = deadline else {
        return UrgencyResult::unscheduled();
    };

    let hours_remaining = hours_between(deadline, now);
    let (status, label) = if deadline < now || hours_remaining < 0.0 {
        (UrgencyStatus::Critical, Some(LABEL_OVERDUE))
    } else if hours_remaining < CRITICAL_HOURS {
        (UrgencyStatus::Critical, Some(LABEL_CRITICAL))
    } else if hours_remaining < URGENT_HOURS {
        (UrgencyStatus::Urgent, Some(LABEL_URGENT))
    } else {
        (UrgencyStatus::Ok, None)
    };

    UrgencyResult { status: Some(status), label, hours_remaining }
}

/// Parses a timestamp as typed by a user or stored by another client.
///
/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM[:SS]`, `YYYY-MM-DD HH:MM[:SS]` and
/// bare dates (midnight). Naive forms are read in `zone`.
pub fn parse_timestamp(raw: &str, zone: impl Into<Zone>) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;
    zone.into().to_utc(naive)
}
