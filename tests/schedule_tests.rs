use chrono::{FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use studiocal::models::{PostKind, PostStatus, SocialNetwork};
use studiocal::schedule::{generate, group_by_month, parse_weekdays, PlanError, PostFilter, PostPlan, DEFAULT_WEEKDAYS};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sao_paulo() -> FixedOffset {
    FixedOffset::west_opt(3 * 3600).unwrap()
}

fn plan(start: NaiveDate, end: NaiveDate) -> PostPlan {
    PostPlan {
        client_id: 7,
        client_name: "Studio A".into(),
        networks: vec![SocialNetwork::Instagram, SocialNetwork::TikTok],
        kind: PostKind::Reel,
        owner_id: Some(2),
        time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        start,
        end,
        weekdays: DEFAULT_WEEKDAYS.to_vec(),
        zone: sao_paulo().into(),
    }
}

#[test]
fn test_generates_one_post_per_day_and_network() {
    let created = Utc.with_ymd_and_hms(2025, 2, 20, 9, 0, 0).unwrap();
    let posts = generate(&plan(date(2025, 3, 1), date(2025, 3, 31)), created).unwrap();

    // 5 Mondays, 4 Wednesdays, 4 Fridays in March 2025.
    assert_eq!(posts.len(), 13 * 2);

    let first = &posts[0];
    assert_eq!(first.scheduled_at, Utc.with_ymd_and_hms(2025, 3, 3, 13, 0, 0).unwrap());
    assert_eq!(first.networks, vec![SocialNetwork::Instagram]);
    assert_eq!(first.title, "[Instagram] Reel - Studio A");
    assert_eq!(first.status, PostStatus::Planned);
    assert_eq!(first.owner_id, Some(2));
    assert_eq!(first.client_id, 7);
    assert_eq!(first.created_at, created);
    assert_eq!(posts[1].networks, vec![SocialNetwork::TikTok]);
    assert_eq!(posts[1].scheduled_at, first.scheduled_at);

    let last = posts.last().unwrap();
    assert_eq!(last.scheduled_at, Utc.with_ymd_and_hms(2025, 3, 31, 13, 0, 0).unwrap());
    assert!(posts.windows(2).all(|w| w[0].scheduled_at <= w[1].scheduled_at));
}

#[test]
fn test_matching_days_respect_weekdays() {
    let mut p = plan(date(2025, 3, 10), date(2025, 3, 16));
    p.weekdays = vec![Weekday::Sat, Weekday::Sun];
    assert_eq!(p.matching_days(), vec![date(2025, 3, 15), date(2025, 3, 16)]);
}

#[test]
fn test_plan_errors() {
    let now = Utc::now();

    let mut p = plan(date(2025, 3, 1), date(2025, 3, 31));
    p.networks.clear();
    assert_eq!(generate(&p, now), Err(PlanError::MissingFields));

    let mut p = plan(date(2025, 3, 1), date(2025, 3, 31));
    p.weekdays.clear();
    assert_eq!(generate(&p, now), Err(PlanError::MissingFields));

    let p = plan(date(2025, 3, 31), date(2025, 3, 1));
    assert!(matches!(generate(&p, now), Err(PlanError::StartAfterEnd { .. })));

    // Saturday and Sunday only.
    let p = plan(date(2025, 3, 1), date(2025, 3, 2));
    assert!(matches!(generate(&p, now), Err(PlanError::NoMatchingDays { .. })));
}

#[test]
fn test_group_by_month_uses_local_dates() {
    let mut p = plan(date(2025, 3, 31), date(2025, 3, 31));
    p.networks = vec![SocialNetwork::Instagram];
    p.time = NaiveTime::from_hms_opt(23, 30, 0).unwrap();
    let posts = generate(&p, Utc::now()).unwrap();

    let local = group_by_month(&posts, sao_paulo());
    assert_eq!(local.keys().collect::<Vec<_>>(), vec!["2025-03"]);

    let utc = group_by_month(&posts, FixedOffset::east_opt(0).unwrap());
    assert_eq!(utc.keys().collect::<Vec<_>>(), vec!["2025-04"]);
}

#[test]
fn test_group_by_month_splits_ranges() {
    let mut p = plan(date(2025, 3, 28), date(2025, 4, 4));
    p.networks = vec![SocialNetwork::Facebook];
    let posts = generate(&p, Utc::now()).unwrap();
    let grouped = group_by_month(&posts, sao_paulo());
    assert_eq!(grouped["2025-03"].len(), 2);
    assert_eq!(grouped["2025-04"].len(), 2);
}

#[test]
fn test_post_filter() {
    let mut posts = generate(&plan(date(2025, 3, 3), date(2025, 3, 5)), Utc::now()).unwrap();
    posts[0].status = PostStatus::Posted;
    posts[1].client_id = 8;

    let posted = PostFilter { status: Some(PostStatus::Posted), client_id: None };
    assert_eq!(posted.apply(&posts).len(), 1);

    let client = PostFilter { status: None, client_id: Some(7) };
    assert_eq!(client.apply(&posts).len(), posts.len() - 1);

    assert_eq!(PostFilter::default().apply(&posts).len(), posts.len());
}

#[test]
fn test_parse_weekdays() {
    assert_eq!(parse_weekdays("seg, qua,sex"), Ok(vec![Weekday::Mon, Weekday::Wed, Weekday::Fri]));
    assert_eq!(parse_weekdays("sat,sun,sat"), Ok(vec![Weekday::Sat, Weekday::Sun]));
    assert!(parse_weekdays("mon,funday").is_err());
}
