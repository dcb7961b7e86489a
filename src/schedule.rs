//! Bulk generation of posting-calendar entries.
//!
//! A plan is a date range, a set of weekdays and a set of networks; every
//! matching day gets one post per network at the same time of day.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use thiserror::Error;

use crate::clock::Zone;
use crate::models::{PostKind, PostStatus, ScheduledPost, SocialNetwork};

/// Monday, Wednesday and Friday.
pub const DEFAULT_WEEKDAYS: [Weekday; 3] = [Weekday::Mon, Weekday::Wed, Weekday::Fri];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("plan needs at least one network and one weekday")]
    MissingFields,
    #[error("start date {start} is after end date {end}")]
    StartAfterEnd { start: NaiveDate, end: NaiveDate },
    #[error("no day between {start} and {end} falls on a selected weekday")]
    NoMatchingDays { start: NaiveDate, end: NaiveDate },
}

#[derive(Debug, Clone)]
pub struct PostPlan {
    pub client_id: u64,
    /// Used in generated titles.
    pub client_name: String,
    pub networks: Vec<SocialNetwork>,
    pub kind: PostKind,
    pub owner_id: Option<u64>,
    /// Local time of day of every post.
    pub time: NaiveTime,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub weekdays: Vec<Weekday>,
    /// Zone the local dates and time are read in, per day.
    pub zone: Zone,
}

impl PostPlan {
    /// Days in `start..=end` that fall on a selected weekday.
    pub fn matching_days(&self) -> Vec<NaiveDate> {
        self.start
            .iter_days()
            .take_while(|d| *d <= self.end)
            .filter(|d| self.weekdays.contains(&d.weekday()))
            .collect()
    }
}

/// Expands a plan into posts, ordered by day then by network.
///
/// Generated posts carry id 0; the store assigns real ids on insert.
pub fn generate(plan: &PostPlan, created_at: DateTime<Utc>) -> Result<Vec<ScheduledPost>, PlanError> {
    if plan.networks.is_empty() || plan.weekdays.is_empty() {
        return Err(PlanError::MissingFields);
    }
    if plan.start > plan.end {
        return Err(PlanError::StartAfterEnd { start: plan.start, end: plan.end });
    }

    let days = plan.matching_days();
    if days.is_empty() {
        return Err(PlanError::NoMatchingDays { start: plan.start, end: plan.end });
    }

    let mut posts = Vec::with_capacity(days.len() * plan.networks.len());
    for day in days {
        let scheduled_at = local_instant(day, plan.time, plan.zone);
        for network in &plan.networks {
            posts.push(ScheduledPost {
                id: 0,
                client_id: plan.client_id,
                post_kind: plan.kind,
                networks: vec![*network],
                scheduled_at,
                owner_id: plan.owner_id,
                status: PostStatus::Planned,
                title: format!("[{}] {} - {}", network, plan.kind, plan.client_name),
                caption: None,
                media_link: None,
                created_at,
            });
        }
    }
    Ok(posts)
}

fn local_instant(day: NaiveDate, time: NaiveTime, zone: Zone) -> DateTime<Utc> {
    let local = day.and_time(time);
    zone.to_utc(local).unwrap_or_else(|| Utc.from_utc_datetime(&local))
}

/// Groups posts by local month key (`YYYY-MM`), each group in input order.
pub fn group_by_month(posts: &[ScheduledPost], zone: impl Into<Zone>) -> BTreeMap<String, Vec<ScheduledPost>> {
    let zone = zone.into();
    let mut grouped: BTreeMap<String, Vec<ScheduledPost>> = BTreeMap::new();
    for post in posts {
        let key = zone.localize(post.scheduled_at).format("%Y-%m").to_string();
        grouped.entry(key).or_default().push(post.clone());
    }
    grouped
}

/// Status and client filter for the posting calendar.
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    pub status: Option<PostStatus>,
    pub client_id: Option<u64>,
}

impl PostFilter {
    pub fn matches(&self, post: &ScheduledPost) -> bool {
        if self.status.is_some_and(|s| s != post.status) {
            return false;
        }
        if self.client_id.is_some_and(|c| c != post.client_id) {
            return false;
        }
        true
    }

    pub fn apply(&self, posts: &[ScheduledPost]) -> Vec<ScheduledPost> {
        posts.iter().filter(|p| self.matches(p)).cloned().collect()
    }
}

/// Parses a weekday list like `mon,wed,fri` or `seg,qua,sex`.
pub fn parse_weekdays(raw: &str) -> Result<Vec<Weekday>, String> {
    let mut days = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let day = match part.to_lowercase().as_str() {
            "mon" | "seg" => Weekday::Mon,
            "tue" | "ter" => Weekday::Tue,
            "wed" | "qua" => Weekday::Wed,
            "thu" | "qui" => Weekday::Thu,
            "fri" | "sex" => Weekday::Fri,
            "sat" | "sab" | "sáb" => Weekday::Sat,
            "sun" | "dom" => Weekday::Sun,
            other => return Err(format!("unknown weekday '{}'", other)),
        };
        if !days.contains(&day) {
            days.push(day);
        }
    }
    Ok(days)
}
