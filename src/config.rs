use std::fs;
use std::path::{Path, PathBuf};

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::clock::Zone;
use crate::deadline::progress::DEFAULT_ALERT_WINDOW_HOURS;
use crate::deadline::{ProgressInput, ProgressPolicy};
use crate::error::{Error, Result};
use crate::locale::Locale;
use crate::models::Task;

pub const CONFIG_FILE: &str = "config.json";

/// Returns the data directory.
///
/// The path is determined in the following order:
/// 1. `STUDIOCAL_DATA` environment variable.
/// 2. `~/.local/share/studiocal` (on Linux).
/// 3. `.` (fallback).
pub fn data_dir() -> PathBuf {
    std::env::var("STUDIOCAL_DATA").map(PathBuf::from).unwrap_or_else(|_| {
        let mut p = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        p.push("studiocal");
        p
    })
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub locale: Locale,
    pub progress_policy: ProgressPolicy,
    /// Alert window for tasks that do not set their own.
    pub alert_window_hours: f64,
    /// Offset such as `-03:00` used for local dates; the machine's when unset.
    pub utc_offset: Option<String>,
    /// Redraw and refetch interval of the dashboard.
    pub tick_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            locale: Locale::default(),
            progress_policy: ProgressPolicy::default(),
            alert_window_hours: DEFAULT_ALERT_WINDOW_HOURS,
            utc_offset: None,
            tick_seconds: 5,
        }
    }
}

impl Config {
    /// Reads `config.json` from `dir` if present, then applies
    /// `STUDIOCAL_LOCALE` and `STUDIOCAL_PROGRESS`.
    pub fn load(dir: &Path) -> Result<Config> {
        let path = dir.join(CONFIG_FILE);
        let mut config = if path.exists() {
            let s = fs::read_to_string(&path)?;
            serde_json::from_str(&s).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?
        } else {
            Config::default()
        };

        if let Ok(raw) = std::env::var("STUDIOCAL_LOCALE") {
            config.locale = raw.parse().map_err(Error::Config)?;
        }
        if let Ok(raw) = std::env::var("STUDIOCAL_PROGRESS") {
            config.progress_policy = raw.parse().map_err(Error::Config)?;
        }
        config.validate()?;
        tracing::debug!(?config, "configuration loaded");
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !self.alert_window_hours.is_finite() || self.alert_window_hours < 0.0 {
            return Err(Error::Config(format!(
                "alert_window_hours must be a non-negative number, got {}",
                self.alert_window_hours
            )));
        }
        self.zone()?;
        Ok(())
    }

    /// The configured offset, or the machine's time zone when unset.
    pub fn zone(&self) -> Result<Zone> {
        match &self.utc_offset {
            Some(raw) => parse_offset(raw)
                .map(Zone::Fixed)
                .ok_or_else(|| Error::Config(format!("invalid utc_offset '{}'", raw))),
            None => Ok(Zone::Local),
        }
    }

    /// Progress inputs for a task, falling back to the configured window.
    pub fn progress_input(&self, task: &Task) -> ProgressInput {
        let mut input = ProgressInput::from(task);
        input.alert_window_hours = Some(task.alert_window_hours.unwrap_or(self.alert_window_hours));
        input
    }
}

/// Parses `+HH:MM`, `-HH:MM`, `+HHMM`, `Z` or `UTC`.
pub fn parse_offset(raw: &str) -> Option<FixedOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0);
    }
    raw.parse().ok()
}
