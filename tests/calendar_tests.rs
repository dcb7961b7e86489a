use chrono::{NaiveDate, TimeZone, Utc};
use studiocal::calendar::{days, posts_by_day, step, tasks_by_day, title, ViewMode};
use studiocal::locale::Locale;
use studiocal::models::{PostKind, PostStatus, ScheduledPost, SocialNetwork, Task};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn task(id: u64, due: NaiveDate) -> Task {
    Task {
        id,
        description: format!("Task {}", id),
        client_id: None,
        task_type_id: None,
        employee_id: None,
        due_date: due,
        start_time: None,
        end_time: None,
        location: None,
        gallery_link: None,
        deadline: None,
        completed: false,
        notes: None,
        alert_window_hours: None,
        created_at: Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap(),
    }
}

#[test]
fn test_month_view_is_padded_to_whole_weeks() {
    let shown = days(ViewMode::Month, date(2025, 3, 18));
    assert_eq!(shown.len(), 42);
    assert_eq!(shown.first(), Some(&date(2025, 2, 24)));
    assert_eq!(shown.last(), Some(&date(2025, 4, 6)));
}

#[test]
fn test_week_view_runs_monday_to_sunday() {
    let shown = days(ViewMode::Week, date(2025, 3, 12));
    assert_eq!(shown, (10..=16).map(|d| date(2025, 3, d)).collect::<Vec<_>>());
}

#[test]
fn test_weekend_view() {
    assert_eq!(days(ViewMode::Weekend, date(2025, 3, 12)), vec![date(2025, 3, 15), date(2025, 3, 16)]);
    assert_eq!(days(ViewMode::Weekend, date(2025, 3, 16)), vec![date(2025, 3, 15), date(2025, 3, 16)]);
    assert_eq!(days(ViewMode::Day, date(2025, 3, 12)), vec![date(2025, 3, 12)]);
}

#[test]
fn test_step_moves_one_unit() {
    assert_eq!(step(ViewMode::Month, date(2025, 1, 31), true), date(2025, 2, 28));
    assert_eq!(step(ViewMode::Month, date(2025, 3, 10), false), date(2025, 2, 10));
    assert_eq!(step(ViewMode::Week, date(2025, 3, 12), true), date(2025, 3, 19));
    assert_eq!(step(ViewMode::Weekend, date(2025, 3, 12), true), date(2025, 3, 22));
    assert_eq!(step(ViewMode::Weekend, date(2025, 3, 16), false), date(2025, 3, 8));
    assert_eq!(step(ViewMode::Day, date(2025, 3, 31), true), date(2025, 4, 1));
}

#[test]
fn test_titles() {
    assert_eq!(title(ViewMode::Month, date(2025, 3, 10), Locale::PtBr), "março 2025");
    assert_eq!(title(ViewMode::Month, date(2025, 3, 10), Locale::En), "March 2025");
    assert_eq!(title(ViewMode::Week, date(2025, 3, 12), Locale::PtBr), "10 - 16 de março 2025");
    assert_eq!(title(ViewMode::Week, date(2025, 3, 31), Locale::PtBr), "31 mar - 6 abr 2025");
    assert_eq!(title(ViewMode::Day, date(2025, 3, 10), Locale::PtBr), "segunda-feira, 10 de março 2025");
    assert_eq!(title(ViewMode::Day, date(2025, 3, 10), Locale::En), "Monday, 10 March 2025");
}

#[test]
fn test_view_mode_parsing() {
    assert_eq!("week".parse::<ViewMode>(), Ok(ViewMode::Week));
    assert_eq!("fim-de-semana".parse::<ViewMode>(), Ok(ViewMode::Weekend));
    assert!("year".parse::<ViewMode>().is_err());
}

#[test]
fn test_grouping_by_day() {
    let tasks = vec![task(1, date(2025, 3, 10)), task(2, date(2025, 3, 11)), task(3, date(2025, 3, 10))];
    let grouped = tasks_by_day(&tasks);
    assert_eq!(grouped[&date(2025, 3, 10)].len(), 2);
    assert_eq!(grouped[&date(2025, 3, 11)].len(), 1);

    let post = ScheduledPost {
        id: 1,
        client_id: 1,
        post_kind: PostKind::Reel,
        networks: vec![SocialNetwork::Instagram],
        // 23:30 on the 10th in São Paulo.
        scheduled_at: Utc.with_ymd_and_hms(2025, 3, 11, 2, 30, 0).unwrap(),
        owner_id: None,
        status: PostStatus::Planned,
        title: "post".into(),
        caption: None,
        media_link: None,
        created_at: Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap(),
    };
    let sao_paulo = chrono::FixedOffset::west_opt(3 * 3600).unwrap();
    let grouped = posts_by_day(&[post], sao_paulo);
    assert!(grouped.contains_key(&date(2025, 3, 10)));
    assert!(!grouped.contains_key(&date(2025, 3, 11)));
}
