use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{Local, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use studiocal::clock::{FixedClock, Zone};
use studiocal::commands::{cmd_client_add, cmd_post_plan, NewClient, PlanArgs};
use studiocal::config::Config;
use studiocal::models::{PostKind, SocialNetwork};
use studiocal::session::Session;
use studiocal::storage::Store;

// New York rules written out so no zoneinfo database is needed. Daylight
// saving ends on Sunday 1 November 2026.
const NEW_YORK: &str = "EST5EDT,M3.2.0,M11.1.0";

// Serialise tests that depend on the TZ environment variable.
static TZ_MUTEX: Mutex<()> = Mutex::new(());

fn with_local_zone_session<F>(test_name: &str, f: F)
where
    F: FnOnce(&Session),
{
    let _guard = TZ_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    env::set_var("TZ", NEW_YORK);

    let mut dir: PathBuf = env::temp_dir();
    dir.push(format!("studiocal_zone_{}_{}", test_name, std::process::id()));
    if dir.exists() {
        fs::remove_dir_all(&dir).unwrap();
    }

    let store = Store::open(&dir).unwrap();
    let clock = FixedClock(Utc.with_ymd_and_hms(2026, 10, 20, 12, 0, 0).unwrap());
    // No utc_offset: local dates follow the machine's zone.
    let session = Session::new(store, Config::default(), clock).unwrap();
    assert_eq!(session.zone(), Zone::Local);

    f(&session);

    fs::remove_dir_all(&dir).unwrap();
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_plan_across_dst_change_keeps_local_time() {
    with_local_zone_session("plan_dst", |session| {
        let client = cmd_client_add(session, NewClient { name: "Maria".into(), ..NewClient::default() }, true).unwrap();
        let args = PlanArgs {
            client: client.id,
            networks: vec![SocialNetwork::Instagram],
            kind: PostKind::Reel,
            owner: None,
            time: "10:00".into(),
            from: date(2026, 10, 30),
            to: date(2026, 11, 2),
            weekdays: "mon,tue,wed,thu,fri,sat,sun".into(),
        };
        let posts = cmd_post_plan(session, args, true).unwrap();
        assert_eq!(posts.len(), 4);

        for post in &posts {
            let local = post.scheduled_at.with_timezone(&Local);
            assert_eq!(local.time(), NaiveTime::from_hms_opt(10, 0, 0).unwrap(), "post {}", post.id);
        }
        // Before the change 10:00 is UTC-4, after it UTC-5.
        assert_eq!(posts[0].scheduled_at, Utc.with_ymd_and_hms(2026, 10, 30, 14, 0, 0).unwrap());
        assert_eq!(posts[3].scheduled_at, Utc.with_ymd_and_hms(2026, 11, 2, 15, 0, 0).unwrap());
    });
}

#[test]
fn test_timestamps_and_days_follow_dst() {
    with_local_zone_session("timestamps_dst", |session| {
        assert_eq!(
            session.parse_timestamp("2026-10-30T18:00"),
            Some(Utc.with_ymd_and_hms(2026, 10, 30, 22, 0, 0).unwrap())
        );
        assert_eq!(
            session.parse_timestamp("2026-11-02T18:00"),
            Some(Utc.with_ymd_and_hms(2026, 11, 2, 23, 0, 0).unwrap())
        );
        assert_eq!(session.today(), date(2026, 10, 20));

        let zone = session.zone();
        // 04:30 UTC is still the previous evening in New York after the change.
        let late = Utc.with_ymd_and_hms(2026, 11, 2, 4, 30, 0).unwrap();
        assert_eq!(zone.date_of(late), date(2026, 11, 1));
        assert_eq!(zone.localize(late).hour(), 23);

        // 01:30 happens twice on 1 November; the earlier (daylight) one wins.
        let repeated = date(2026, 11, 1).and_hms_opt(1, 30, 0).unwrap();
        assert_eq!(zone.to_utc(repeated), Some(Utc.with_ymd_and_hms(2026, 11, 1, 5, 30, 0).unwrap()));

        // 02:30 does not exist on 8 March; it is read an hour later.
        let skipped = date(2026, 3, 8).and_hms_opt(2, 30, 0).unwrap();
        assert_eq!(zone.to_utc(skipped), Some(Utc.with_ymd_and_hms(2026, 3, 8, 7, 30, 0).unwrap()));
    });
}
