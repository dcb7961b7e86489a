use chrono::{DateTime, Datelike, Months, NaiveDateTime, Utc};

use super::parse_timestamp;
use crate::clock::Zone;

const MINUTES_IN_DAY: i64 = 1440;
const MINUTES_IN_MONTH: i64 = 43_200;

/// Bucketed size of a time gap, before wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Distance {
    LessThanMinute,
    Minutes(i64),
    AboutHours(i64),
    Days(i64),
    AboutMonths(i64),
    Months(i64),
    AboutYears(i64),
    OverYears(i64),
    AlmostYears(i64),
}

/// Whether the deadline lies ahead of or behind "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tense {
    Future,
    Past,
}

/// Turns a bucketed distance into a phrase with a tense affix.
pub trait RelativeFormatter {
    fn format(&self, distance: Distance, tense: Tense) -> String;
}

/// Buckets the gap between two instants.
pub fn distance_between(a: DateTime<Utc>, b: DateTime<Utc>) -> Distance {
    let seconds = (a - b).num_seconds().abs();
    let minutes = (seconds as f64 / 60.0).round() as i64;

    if minutes == 0 {
        Distance::LessThanMinute
    } else if minutes < 45 {
        Distance::Minutes(minutes)
    } else if minutes < 90 {
        Distance::AboutHours(1)
    } else if minutes < MINUTES_IN_DAY {
        Distance::AboutHours((minutes as f64 / 60.0).round() as i64)
    } else if minutes < 2520 {
        Distance::Days(1)
    } else if minutes < MINUTES_IN_MONTH {
        Distance::Days((minutes as f64 / MINUTES_IN_DAY as f64).round() as i64)
    } else if minutes < 2 * MINUTES_IN_MONTH {
        Distance::AboutMonths((minutes as f64 / MINUTES_IN_MONTH as f64).round() as i64)
    } else {
        let (later, earlier) = if a >= b { (a, b) } else { (b, a) };
        let months = calendar_months(later.naive_utc(), earlier.naive_utc());
        if months < 12 {
            Distance::Months((minutes as f64 / MINUTES_IN_MONTH as f64).round() as i64)
        } else {
            let years = months / 12;
            match months % 12 {
                r if r < 3 => Distance::AboutYears(years),
                r if r < 9 => Distance::OverYears(years),
                _ => Distance::AlmostYears(years + 1),
            }
        }
    }
}

/// Whole calendar months from `earlier` to `later`.
fn calendar_months(later: NaiveDateTime, earlier: NaiveDateTime) -> i64 {
    let mut months = i64::from(later.year() - earlier.year()) * 12 + i64::from(later.month())
        - i64::from(earlier.month());
    if months > 0 {
        let reached = u32::try_from(months)
            .ok()
            .and_then(|m| earlier.checked_add_months(Months::new(m)));
        if reached.map_or(true, |r| r > later) {
            months -= 1;
        }
    }
    months
}

/// Human-readable distance from `now` to `deadline`, e.g. "em 3 horas".
///
/// Returns `None` when there is no deadline.
pub fn relative_label(
    deadline: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    formatter: &dyn RelativeFormatter,
) -> Option<String> {
    let deadline = deadline?;
    let tense = if deadline > now { Tense::Future } else { Tense::Past };
    Some(formatter.format(distance_between(deadline, now), tense))
}

/// Same as [`relative_label`] for a raw timestamp string.
///
/// Unparsable input yields `None`. Naive timestamps are read in `zone`.
pub fn relative_label_str(
    raw: Option<&str>,
    now: DateTime<Utc>,
    zone: impl Into<Zone>,
    formatter: &dyn RelativeFormatter,
) -> Option<String> {
    let deadline = parse_timestamp(raw?, zone)?;
    relative_label(Some(deadline), now, formatter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn buckets_follow_minute_thresholds() {
        let now = base();
        assert_eq!(distance_between(now + Duration::seconds(20), now), Distance::LessThanMinute);
        assert_eq!(distance_between(now + Duration::minutes(44), now), Distance::Minutes(44));
        assert_eq!(distance_between(now + Duration::minutes(45), now), Distance::AboutHours(1));
        assert_eq!(distance_between(now + Duration::hours(3), now), Distance::AboutHours(3));
        assert_eq!(distance_between(now + Duration::hours(30), now), Distance::Days(1));
        assert_eq!(distance_between(now + Duration::hours(42), now), Distance::Days(2));
        assert_eq!(distance_between(now + Duration::days(35), now), Distance::AboutMonths(1));
        assert_eq!(distance_between(now + Duration::days(150), now), Distance::Months(5));
    }

    #[test]
    fn year_buckets() {
        let now = base();
        assert_eq!(distance_between(now + Duration::days(370), now), Distance::AboutYears(1));
        assert_eq!(distance_between(now + Duration::days(540), now), Distance::OverYears(1));
        assert_eq!(distance_between(now + Duration::days(700), now), Distance::AlmostYears(2));
    }

    #[test]
    fn year_buckets_count_calendar_months() {
        let now = base();
        // 360 days is still eleven whole months after 10 March.
        assert_eq!(distance_between(now + Duration::days(360), now), Distance::Months(12));
        assert_eq!(distance_between(now + Duration::days(365), now), Distance::AboutYears(1));
        assert_eq!(distance_between(now - Duration::days(360), now), Distance::Months(12));
    }

    #[test]
    fn distance_is_symmetric() {
        let now = base();
        assert_eq!(
            distance_between(now - Duration::hours(5), now),
            distance_between(now + Duration::hours(5), now)
        );
    }
}
