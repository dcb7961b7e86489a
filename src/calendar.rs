use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};

use crate::clock::Zone;
use crate::filters::week_bounds;
use crate::locale::Locale;
use crate::models::{ScheduledPost, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Month,
    Week,
    Weekend,
    Day,
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "month" | "mensal" => Ok(ViewMode::Month),
            "week" | "semanal" => Ok(ViewMode::Week),
            "weekend" | "fim-de-semana" => Ok(ViewMode::Weekend),
            "day" | "diario" | "diário" => Ok(ViewMode::Day),
            other => Err(format!("unknown view '{}' (month, week, weekend, day)", other)),
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViewMode::Month => "month",
            ViewMode::Week => "week",
            ViewMode::Weekend => "weekend",
            ViewMode::Day => "day",
        };
        f.write_str(name)
    }
}

/// Saturday of the weekend `anchor` belongs to, or the coming one.
fn weekend_saturday(anchor: NaiveDate) -> NaiveDate {
    match anchor.weekday() {
        Weekday::Sat => anchor,
        Weekday::Sun => anchor - Duration::days(1),
        other => anchor + Duration::days(5 - other.num_days_from_monday() as i64),
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn last_of_month(date: NaiveDate) -> NaiveDate {
    first_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|d| d.pred_opt())
        .unwrap_or(date)
}

/// Days shown by a view around `anchor`.
///
/// Month views are padded to whole Monday-start weeks.
pub fn days(view: ViewMode, anchor: NaiveDate) -> Vec<NaiveDate> {
    let (start, end) = match view {
        ViewMode::Month => (
            week_bounds(first_of_month(anchor)).0,
            week_bounds(last_of_month(anchor)).1,
        ),
        ViewMode::Week => week_bounds(anchor),
        ViewMode::Weekend => {
            let sat = weekend_saturday(anchor);
            (sat, sat + Duration::days(1))
        }
        ViewMode::Day => (anchor, anchor),
    };
    start.iter_days().take_while(|d| *d <= end).collect()
}

/// Moves the anchor one view unit back or forward.
pub fn step(view: ViewMode, anchor: NaiveDate, forward: bool) -> NaiveDate {
    let sign = if forward { 1 } else { -1 };
    match view {
        ViewMode::Month => {
            let months = Months::new(1);
            let moved = if forward {
                anchor.checked_add_months(months)
            } else {
                anchor.checked_sub_months(months)
            };
            moved.unwrap_or(anchor)
        }
        ViewMode::Week => anchor + Duration::weeks(sign),
        ViewMode::Weekend => weekend_saturday(anchor) + Duration::weeks(sign),
        ViewMode::Day => anchor + Duration::days(sign),
    }
}

fn short_month(locale: Locale, month: u32) -> String {
    locale.month_name(month).chars().take(3).collect()
}

/// Header line for a view.
pub fn title(view: ViewMode, anchor: NaiveDate, locale: Locale) -> String {
    match view {
        ViewMode::Month => format!("{} {}", locale.month_name(anchor.month()), anchor.year()),
        ViewMode::Week => {
            let (start, end) = week_bounds(anchor);
            if start.month() == end.month() {
                format!("{} - {} {}", start.day(), locale.day_of_month(end.day(), end.month()), end.year())
            } else {
                format!(
                    "{} {} - {} {} {}",
                    start.day(),
                    short_month(locale, start.month()),
                    end.day(),
                    short_month(locale, end.month()),
                    end.year()
                )
            }
        }
        ViewMode::Weekend => {
            let sat = weekend_saturday(anchor);
            let sun = sat + Duration::days(1);
            format!("{} - {} {}", sat.day(), locale.day_of_month(sun.day(), sun.month()), sun.year())
        }
        ViewMode::Day => format!(
            "{}, {} {}",
            locale.weekday_long(anchor.weekday()),
            locale.day_of_month(anchor.day(), anchor.month()),
            anchor.year()
        ),
    }
}

pub fn tasks_by_day(tasks: &[Task]) -> BTreeMap<NaiveDate, Vec<Task>> {
    let mut map: BTreeMap<NaiveDate, Vec<Task>> = BTreeMap::new();
    for task in tasks {
        map.entry(task.due_date).or_default().push(task.clone());
    }
    map
}

/// Groups posts by their local calendar day.
pub fn posts_by_day(posts: &[ScheduledPost], zone: impl Into<Zone>) -> BTreeMap<NaiveDate, Vec<ScheduledPost>> {
    let zone = zone.into();
    let mut map: BTreeMap<NaiveDate, Vec<ScheduledPost>> = BTreeMap::new();
    for post in posts {
        let day = zone.date_of(post.scheduled_at);
        map.entry(day).or_default().push(post.clone());
    }
    map
}
