use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::clock::{Clock, SystemClock, Zone};
use crate::config::{data_dir, Config};
use crate::deadline::{self, ProgressBar, UrgencyResult};
use crate::error::Result;
use crate::models::Task;
use crate::storage::Store;

/// Everything a command or view needs: the store, settings, a clock and
/// the zone local dates are read in.
pub struct Session {
    pub store: Store,
    pub config: Config,
    zone: Zone,
    clock: Box<dyn Clock + Send + Sync>,
}

/// Derived deadline view of one task at one instant.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DeadlineView {
    pub urgency: UrgencyResult,
    pub relative: Option<String>,
    pub progress: ProgressBar,
}

impl Session {
    pub fn new(store: Store, config: Config, clock: impl Clock + Send + Sync + 'static) -> Result<Session> {
        let zone = config.zone()?;
        Ok(Session { store, config, zone, clock: Box::new(clock) })
    }

    /// Opens the store and configuration in the default data directory.
    pub fn open_default() -> Result<Session> {
        let dir = data_dir();
        let store = Store::open(&dir)?;
        let config = Config::load(&dir)?;
        Session::new(store, config, SystemClock)
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }

    pub fn today(&self) -> NaiveDate {
        self.zone.date_of(self.now())
    }

    /// Parses a user-typed timestamp in the session's zone.
    pub fn parse_timestamp(&self, raw: &str) -> Option<DateTime<Utc>> {
        deadline::parse_timestamp(raw, self.zone)
    }

    /// Urgency, relative label and progress bar of `task` right now.
    pub fn deadline_view(&self, task: &Task) -> DeadlineView {
        let now = self.now();
        DeadlineView {
            urgency: deadline::classify(task.deadline, task.completed, now),
            relative: deadline::relative_label(task.deadline, now, &self.config.locale),
            progress: deadline::progress(self.config.progress_policy, &self.config.progress_input(task), now),
        }
    }
}
