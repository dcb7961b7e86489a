use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Source of "now" for everything time-dependent.
///
/// Views and commands never read the system clock directly, so tests can
/// freeze time with [`FixedClock`].
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stuck at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// How local dates and wall-clock times map to instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    /// A configured offset such as `-03:00`.
    Fixed(FixedOffset),
    /// The machine's time zone, resolved per instant so daylight saving
    /// changes are honoured.
    Local,
}

impl Zone {
    /// The instant a local wall-clock time names.
    ///
    /// A time skipped by a daylight saving jump is read one hour later; a
    /// repeated time resolves to the earlier instant.
    pub fn to_utc(&self, local: NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            Zone::Fixed(offset) => resolve(offset, local),
            Zone::Local => resolve(&Local, local),
        }
    }

    /// `at` as local time, carrying the offset in effect at that instant.
    pub fn localize(&self, at: DateTime<Utc>) -> DateTime<FixedOffset> {
        match self {
            Zone::Fixed(offset) => at.with_timezone(offset),
            Zone::Local => {
                let local = at.with_timezone(&Local);
                local.with_timezone(local.offset())
            }
        }
    }

    pub fn date_of(&self, at: DateTime<Utc>) -> NaiveDate {
        self.localize(at).date_naive()
    }
}

impl From<FixedOffset> for Zone {
    fn from(offset: FixedOffset) -> Self {
        Zone::Fixed(offset)
    }
}

fn resolve<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&local)
        .earliest()
        .or_else(|| {
            let shifted = local.checked_add_signed(Duration::hours(1))?;
            tz.from_local_datetime(&shifted).earliest()
        })
        .map(|dt| dt.with_timezone(&Utc))
}
