use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use studiocal::clock::{Clock, FixedClock};
use studiocal::deadline::progress::{countdown_window, elapsed_fraction};
use studiocal::deadline::{
    classify, parse_timestamp, progress, relative_label, relative_label_str, ColorToken, ProgressInput,
    ProgressPolicy, UrgencyStatus, LABEL_CRITICAL, LABEL_DONE, LABEL_OVERDUE, LABEL_URGENT,
};
use studiocal::locale::Locale;

fn clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap())
}

fn hours(h: f64) -> Duration {
    Duration::milliseconds((h * 3_600_000.0).round() as i64)
}

fn status_at(offset_hours: f64) -> (Option<UrgencyStatus>, Option<&'static str>) {
    let now = clock().now();
    let r = classify(Some(now + hours(offset_hours)), false, now);
    (r.status, r.label)
}

#[test]
fn test_completed_is_always_done() {
    let now = clock().now();
    for deadline in [None, Some(now - hours(500.0)), Some(now), Some(now + hours(3.0)), Some(now + hours(900.0))] {
        let r = classify(deadline, true, now);
        assert_eq!(r.status, Some(UrgencyStatus::Done));
        assert_eq!(r.label, Some(LABEL_DONE));
        assert_eq!(r.hours_remaining, f64::INFINITY);
    }
}

#[test]
fn test_no_deadline_has_no_status() {
    let r = classify(None, false, clock().now());
    assert_eq!(r.status, None);
    assert_eq!(r.label, None);
    assert_eq!(r.hours_remaining, f64::INFINITY);
    assert!(r.badge().is_none());
}

#[test]
fn test_past_deadlines_are_overdue() {
    for h in [-0.01, -0.5, -1.0, -23.0, -200.0] {
        assert_eq!(status_at(h), (Some(UrgencyStatus::Critical), Some(LABEL_OVERDUE)), "{} hours", h);
    }
}

#[test]
fn test_critical_boundary() {
    assert_eq!(status_at(23.99), (Some(UrgencyStatus::Critical), Some(LABEL_CRITICAL)));
    assert_eq!(status_at(24.0), (Some(UrgencyStatus::Urgent), Some(LABEL_URGENT)));
    assert_eq!(status_at(24.01), (Some(UrgencyStatus::Urgent), Some(LABEL_URGENT)));
}

#[test]
fn test_urgent_boundary() {
    assert_eq!(status_at(47.99), (Some(UrgencyStatus::Urgent), Some(LABEL_URGENT)));
    assert_eq!(status_at(48.0), (Some(UrgencyStatus::Ok), None));
    assert_eq!(status_at(48.01), (Some(UrgencyStatus::Ok), None));
}

#[test]
fn test_deadline_exactly_now_is_critical_not_overdue() {
    assert_eq!(status_at(0.0), (Some(UrgencyStatus::Critical), Some(LABEL_CRITICAL)));
}

#[test]
fn test_severity_is_monotonic() {
    let mut last = UrgencyStatus::Critical;
    for h in [-10.0, 0.0, 5.0, 23.0, 24.0, 30.0, 47.0, 48.0, 100.0] {
        let status = status_at(h).0.unwrap();
        assert!(status <= last, "{:?} after {:?} at {} hours", status, last, h);
        last = status;
    }
}

#[test]
fn test_scenario_a_ten_hours_left() {
    assert_eq!(status_at(10.0), (Some(UrgencyStatus::Critical), Some("Crítico")));
}

#[test]
fn test_scenario_b_thirty_hours_left() {
    assert_eq!(status_at(30.0), (Some(UrgencyStatus::Urgent), Some("Urgente")));
}

#[test]
fn test_scenario_c_one_hour_late() {
    assert_eq!(status_at(-1.0), (Some(UrgencyStatus::Critical), Some("Atrasado")));
}

#[test]
fn test_scenario_d_late_but_completed() {
    let now = clock().now();
    let r = classify(Some(now - hours(5.0)), true, now);
    assert_eq!(r.status, Some(UrgencyStatus::Done));
    assert_eq!(r.label, Some("Concluída"));
}

#[test]
fn test_scenario_e_outside_alert_window() {
    let now = clock().now();
    let bar = countdown_window(Some(now + hours(200.0)), false, 120.0, now);
    assert_eq!(bar.percent, 0);
    assert_eq!(bar.color, ColorToken::Neutral);
}

#[test]
fn test_hours_remaining_truncates() {
    let now = clock().now();
    assert_eq!(classify(Some(now + hours(30.9)), false, now).hours_remaining, 30.0);
    assert_eq!(classify(Some(now - hours(2.5)), false, now).hours_remaining, -2.0);
}

#[test]
fn test_badges() {
    let now = clock().now();
    let badge = classify(Some(now + hours(5.0)), false, now).badge().unwrap();
    assert_eq!(badge.label, LABEL_CRITICAL);
    assert!(badge.pulse);

    let badge = classify(Some(now - hours(5.0)), false, now).badge().unwrap();
    assert_eq!(badge.label, LABEL_OVERDUE);

    let badge = classify(Some(now + hours(40.0)), false, now).badge().unwrap();
    assert_eq!(badge.label, LABEL_URGENT);
    assert!(!badge.pulse);

    assert!(classify(Some(now + hours(100.0)), false, now).badge().is_none());
    assert!(classify(Some(now - hours(100.0)), true, now).badge().is_none());
}

#[test]
fn test_elapsed_fraction_policy() {
    let now = clock().now();
    let created = now - hours(10.0);

    let bar = elapsed_fraction(created, Some(now + hours(30.0)), false, now);
    assert_eq!(bar.percent, 25);
    assert_eq!(bar.color, ColorToken::Neutral);

    let bar = elapsed_fraction(created, Some(now + hours(10.0)), false, now);
    assert_eq!(bar.percent, 50);
    assert_eq!(bar.color, ColorToken::Warning);

    let bar = elapsed_fraction(created, Some(now + hours(2.5)), false, now);
    assert_eq!(bar.percent, 80);
    assert_eq!(bar.color, ColorToken::Danger);

    let bar = elapsed_fraction(created, Some(now - hours(5.0)), false, now);
    assert_eq!(bar.percent, 100);

    let bar = elapsed_fraction(created, Some(now + hours(5.0)), true, now);
    assert_eq!((bar.percent, bar.color), (100, ColorToken::Done));

    let bar = elapsed_fraction(created, None, false, now);
    assert_eq!((bar.percent, bar.color), (0, ColorToken::Muted));
}

#[test]
fn test_elapsed_fraction_empty_window() {
    let now = clock().now();
    let created = now - hours(1.0);
    let bar = elapsed_fraction(created, Some(created), false, now);
    assert_eq!((bar.percent, bar.color), (100, ColorToken::Overdue));

    let bar = elapsed_fraction(created, Some(created - hours(3.0)), false, now);
    assert_eq!((bar.percent, bar.color), (100, ColorToken::Overdue));
}

#[test]
fn test_elapsed_fraction_before_creation_is_zero() {
    let now = clock().now();
    let bar = elapsed_fraction(now + hours(1.0), Some(now + hours(10.0)), false, now);
    assert_eq!(bar.percent, 0);
}

#[test]
fn test_countdown_policy() {
    let now = clock().now();

    let bar = countdown_window(Some(now + hours(60.0)), false, 120.0, now);
    assert_eq!(bar.percent, 50);
    assert_eq!(bar.color, ColorToken::Gradient(4));

    let bar = countdown_window(Some(now + hours(119.0)), false, 120.0, now);
    assert_eq!(bar.percent, 1);
    assert_eq!(bar.color, ColorToken::Gradient(0));

    let bar = countdown_window(Some(now + hours(6.0)), false, 120.0, now);
    assert_eq!(bar.percent, 95);
    assert_eq!(bar.color, ColorToken::Gradient(8));

    let bar = countdown_window(Some(now - hours(1.0)), false, 120.0, now);
    assert_eq!((bar.percent, bar.color), (100, ColorToken::Overdue));

    let bar = countdown_window(Some(now - hours(1.0)), true, 120.0, now);
    assert_eq!((bar.percent, bar.color), (100, ColorToken::Done));
}

#[test]
fn test_countdown_zero_window() {
    let now = clock().now();
    for window in [0.0, -5.0, f64::NAN] {
        let bar = countdown_window(Some(now + hours(1.0)), false, window, now);
        assert_eq!((bar.percent, bar.color), (0, ColorToken::Neutral));
    }
}

#[test]
fn test_percent_always_in_range() {
    let now = clock().now();
    let offsets = [-1000.0, -48.0, -1.0, 0.0, 0.5, 12.0, 47.0, 119.0, 120.0, 121.0, 10_000.0];
    let windows = [0.0, 1.0, 24.0, 120.0, 1e9];
    for created in offsets {
        for deadline in offsets {
            for window in windows {
                for completed in [false, true] {
                    let input = ProgressInput {
                        deadline: Some(now + hours(deadline)),
                        created_at: now + hours(created),
                        completed,
                        alert_window_hours: Some(window),
                    };
                    for policy in [ProgressPolicy::ElapsedFraction, ProgressPolicy::CountdownWindow] {
                        assert!(progress(policy, &input, now).percent <= 100);
                    }
                }
            }
        }
    }
}

#[test]
fn test_progress_defaults_alert_window() {
    let now = clock().now();
    let input = ProgressInput {
        deadline: Some(now + hours(60.0)),
        created_at: now - hours(60.0),
        completed: false,
        alert_window_hours: None,
    };
    assert_eq!(progress(ProgressPolicy::CountdownWindow, &input, now).percent, 50);
    assert_eq!(progress(ProgressPolicy::ElapsedFraction, &input, now).percent, 50);
}

#[test]
fn test_identical_inputs_identical_results() {
    let now = clock().now();
    let deadline = Some(now + hours(30.0));
    assert_eq!(classify(deadline, false, now), classify(deadline, false, now));

    let input = ProgressInput { deadline, created_at: now - hours(3.0), completed: false, alert_window_hours: None };
    for policy in [ProgressPolicy::ElapsedFraction, ProgressPolicy::CountdownWindow] {
        assert_eq!(progress(policy, &input, now), progress(policy, &input, now));
    }
    assert_eq!(
        relative_label(deadline, now, &Locale::PtBr),
        relative_label(deadline, now, &Locale::PtBr)
    );
}

#[test]
fn test_relative_label_pt_br() {
    let now = clock().now();
    assert_eq!(relative_label(Some(now + hours(3.0)), now, &Locale::PtBr).unwrap(), "em cerca de 3 horas");
    assert_eq!(relative_label(Some(now - hours(48.0)), now, &Locale::PtBr).unwrap(), "há 2 dias");
    assert_eq!(relative_label(Some(now + Duration::minutes(1)), now, &Locale::PtBr).unwrap(), "em 1 minuto");
    assert_eq!(relative_label(None, now, &Locale::PtBr), None);
}

#[test]
fn test_relative_label_en() {
    let now = clock().now();
    assert_eq!(relative_label(Some(now + hours(3.0)), now, &Locale::En).unwrap(), "in about 3 hours");
    assert_eq!(relative_label(Some(now - hours(48.0)), now, &Locale::En).unwrap(), "2 days ago");
}

#[test]
fn test_relative_label_unparsable() {
    let now = clock().now();
    let utc = FixedOffset::east_opt(0).unwrap();
    assert_eq!(relative_label_str(Some("not a date"), now, utc, &Locale::PtBr), None);
    assert_eq!(relative_label_str(Some(""), now, utc, &Locale::PtBr), None);
    assert_eq!(relative_label_str(None, now, utc, &Locale::PtBr), None);
    assert_eq!(
        relative_label_str(Some("2025-03-10T15:00:00Z"), now, utc, &Locale::En).as_deref(),
        Some("in about 3 hours")
    );
}

#[test]
fn test_parse_timestamp_reads_naive_at_offset() {
    let sao_paulo = FixedOffset::west_opt(3 * 3600).unwrap();
    let expected: DateTime<Utc> = Utc.with_ymd_and_hms(2025, 3, 14, 21, 0, 0).unwrap();
    assert_eq!(parse_timestamp("2025-03-14T18:00", sao_paulo), Some(expected));
    assert_eq!(parse_timestamp("2025-03-14 18:00:00", sao_paulo), Some(expected));
    assert_eq!(parse_timestamp("2025-03-14T21:00:00+00:00", sao_paulo), Some(expected));
    assert_eq!(
        parse_timestamp("2025-03-14", sao_paulo),
        Some(Utc.with_ymd_and_hms(2025, 3, 14, 3, 0, 0).unwrap())
    );
    assert_eq!(parse_timestamp("14/03/2025", sao_paulo), None);
}
