use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{parse_hex_color, Task};

pub const DEFAULT_ALERT_WINDOW_HOURS: f64 = 120.0;

/// Hex colours of the countdown gradient, green to dark red.
const GRADIENT: [&str; 9] = [
    "#22c55e", "#84cc16", "#facc15", "#eab308", "#f59e0b",
    "#f97316", "#ea580c", "#dc2626", "#991b1b",
];

/// How the progress bar under a task is filled.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ProgressPolicy {
    /// Share of the task's lifetime (creation to deadline) already spent.
    #[default]
    ElapsedFraction,
    /// How far into the alert window before the deadline we are.
    CountdownWindow,
}

impl FromStr for ProgressPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "elapsed" | "elapsed-fraction" => Ok(ProgressPolicy::ElapsedFraction),
            "countdown" | "countdown-window" => Ok(ProgressPolicy::CountdownWindow),
            other => Err(format!("unknown progress policy '{}' (use elapsed or countdown)", other)),
        }
    }
}

impl fmt::Display for ProgressPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressPolicy::ElapsedFraction => write!(f, "elapsed"),
            ProgressPolicy::CountdownWindow => write!(f, "countdown"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorToken {
    /// No deadline to measure against.
    Muted,
    Neutral,
    Warning,
    Danger,
    Done,
    Overdue,
    /// Countdown gradient step, 0 (green) to 8 (dark red).
    Gradient(u8),
}

impl ColorToken {
    pub fn hex(&self) -> &'static str {
        match self {
            ColorToken::Muted => "#64748b",
            ColorToken::Neutral => "#64748b",
            ColorToken::Warning => "#eab308",
            ColorToken::Danger => "#dc2626",
            ColorToken::Done => "#22c55e",
            ColorToken::Overdue => "#7f1d1d",
            ColorToken::Gradient(step) => GRADIENT[(*step as usize).min(GRADIENT.len() - 1)],
        }
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        parse_hex_color(self.hex()).unwrap_or((100, 116, 139))
    }
}

impl fmt::Display for ColorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorToken::Muted => write!(f, "muted"),
            ColorToken::Neutral => write!(f, "neutral"),
            ColorToken::Warning => write!(f, "warning"),
            ColorToken::Danger => write!(f, "danger"),
            ColorToken::Done => write!(f, "done"),
            ColorToken::Overdue => write!(f, "overdue"),
            ColorToken::Gradient(step) => write!(f, "gradient-{}", step),
        }
    }
}

impl Serialize for ColorToken {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressBar {
    /// Always within `0..=100`.
    pub percent: u8,
    pub color: ColorToken,
}

impl ProgressBar {
    fn new(percent: u8, color: ColorToken) -> Self {
        ProgressBar { percent, color }
    }
}

/// The task fields the progress policies read.
#[derive(Debug, Clone, Copy)]
pub struct ProgressInput {
    pub deadline: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub completed: bool,
    pub alert_window_hours: Option<f64>,
}

impl From<&Task> for ProgressInput {
    fn from(task: &Task) -> Self {
        ProgressInput {
            deadline: task.deadline,
            created_at: task.created_at,
            completed: task.completed,
            alert_window_hours: task.alert_window_hours,
        }
    }
}

pub fn progress(policy: ProgressPolicy, input: &ProgressInput, now: DateTime<Utc>) -> ProgressBar {
    match policy {
        ProgressPolicy::ElapsedFraction => {
            elapsed_fraction(input.created_at, input.deadline, input.completed, now)
        }
        ProgressPolicy::CountdownWindow => countdown_window(
            input.deadline,
            input.completed,
            input.alert_window_hours.unwrap_or(DEFAULT_ALERT_WINDOW_HOURS),
            now,
        ),
    }
}

/// Fills the bar with the share of `created_at..deadline` already elapsed.
///
/// A deadline at or before creation leaves no window to measure and reads
/// as fully overdue.
pub fn elapsed_fraction(
    created_at: DateTime<Utc>,
    deadline: Option<DateTime<Utc>>,
    completed: bool,
    now: DateTime<Utc>,
) -> ProgressBar {
    let Some(deadline) = deadline else {
        return ProgressBar::new(0, ColorToken::Muted);
    };
    if completed {
        return ProgressBar::new(100, ColorToken::Done);
    }

    let total_ms = (deadline - created_at).num_milliseconds();
    if total_ms <= 0 {
        return ProgressBar::new(100, ColorToken::Overdue);
    }
    let elapsed_ms = (now - created_at).num_milliseconds();
    let percent = to_percent(elapsed_ms as f64 / total_ms as f64 * 100.0);

    let color = if percent >= 80 {
        ColorToken::Danger
    } else if percent >= 50 {
        ColorToken::Warning
    } else {
        ColorToken::Neutral
    };
    ProgressBar::new(percent, color)
}

/// Fills the bar as the deadline approaches within the alert window.
///
/// Outside the window the bar is empty; a non-positive window never fills.
pub fn countdown_window(
    deadline: Option<DateTime<Utc>>,
    completed: bool,
    window_hours: f64,
    now: DateTime<Utc>,
) -> ProgressBar {
    let Some(deadline) = deadline else {
        return ProgressBar::new(0, ColorToken::Muted);
    };
    if completed {
        return ProgressBar::new(100, ColorToken::Done);
    }
    if deadline < now {
        return ProgressBar::new(100, ColorToken::Overdue);
    }
    if !window_hours.is_finite() || window_hours <= 0.0 {
        return ProgressBar::new(0, ColorToken::Neutral);
    }

    let hours_left = (deadline - now).num_milliseconds() as f64 / 3_600_000.0;
    if hours_left > window_hours {
        return ProgressBar::new(0, ColorToken::Neutral);
    }
    let percent = to_percent((window_hours - hours_left) / window_hours * 100.0);
    ProgressBar::new(percent, ColorToken::Gradient(gradient_step(percent)))
}

/// Steps of roughly 11 points: `..=11` is 0, `12..=22` is 1, `> 88` is 8.
fn gradient_step(percent: u8) -> u8 {
    if percent <= 11 {
        0
    } else if percent > 88 {
        8
    } else {
        (percent - 1) / 11
    }
}

fn to_percent(raw: f64) -> u8 {
    if raw.is_nan() {
        return 0;
    }
    raw.clamp(0.0, 100.0).round() as u8
}
