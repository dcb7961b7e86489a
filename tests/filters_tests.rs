use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use studiocal::filters::{sort_by_deadline, week_bounds, Directory, QuickPeriod, TaskFilter};
use studiocal::models::{Client, Employee, Task, TaskType};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn created() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()
}

/// Wednesday.
fn today() -> NaiveDate {
    date(2025, 3, 12)
}

fn task(id: u64, description: &str, due: NaiveDate) -> Task {
    Task {
        id,
        description: description.into(),
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
        created_at: created(),
    }
}

fn directory() -> Directory {
    Directory::new(
        vec![Client {
            id: 1,
            name: "Maria Souza".into(),
            email: None,
            phone: None,
            company: None,
            notes: None,
            active: true,
            created_at: created(),
        }],
        vec![Employee {
            id: 5,
            name: "João".into(),
            email: None,
            phone: None,
            role: Some("Fotógrafo".into()),
            color: "#5d109c".into(),
            active: true,
            created_at: created(),
        }],
        vec![TaskType {
            id: 9,
            name: "Ensaio".into(),
            color: "#22c55e".into(),
            icon: "camera".into(),
            active: true,
            created_at: created(),
        }],
    )
}

fn sample() -> Vec<Task> {
    let mut a = task(1, "Ensaio gestante", today());
    a.client_id = Some(1);
    a.task_type_id = Some(9);
    let mut b = task(2, "Edição casamento", date(2025, 3, 13));
    b.employee_id = Some(5);
    b.location = Some("Parque Ibirapuera".into());
    let mut c = task(3, "Entrega álbum", date(2025, 3, 20));
    c.completed = true;
    vec![a, b, c]
}

fn ids(tasks: &[Task]) -> Vec<u64> {
    let mut ids: Vec<u64> = tasks.iter().map(|t| t.id).collect();
    ids.sort();
    ids
}

#[test]
fn test_empty_filter_keeps_everything() {
    let tasks = sample();
    assert_eq!(ids(&TaskFilter::default().apply(&tasks, &directory(), today())), vec![1, 2, 3]);
}

#[test]
fn test_hide_completed() {
    let filter = TaskFilter { hide_completed: true, ..TaskFilter::default() };
    assert_eq!(ids(&filter.apply(&sample(), &directory(), today())), vec![1, 2]);
}

#[test]
fn test_search_covers_related_names() {
    let dir = directory();
    let tasks = sample();
    let search = |q: &str| {
        let filter = TaskFilter { search: Some(q.into()), ..TaskFilter::default() };
        ids(&filter.apply(&tasks, &dir, today()))
    };
    assert_eq!(search("maria"), vec![1]);
    assert_eq!(search("JOÃO"), vec![2]);
    assert_eq!(search("ibirapuera"), vec![2]);
    assert_eq!(search("álbum"), vec![3]);
    assert_eq!(search("   "), vec![1, 2, 3]);
    assert!(search("nothing").is_empty());
}

#[test]
fn test_quick_periods() {
    assert!(QuickPeriod::Today.contains(today(), today()));
    assert!(QuickPeriod::Tomorrow.contains(date(2025, 3, 13), today()));
    assert!(!QuickPeriod::Tomorrow.contains(today(), today()));
    assert!(QuickPeriod::Week.contains(date(2025, 3, 10), today()));
    assert!(QuickPeriod::Week.contains(date(2025, 3, 16), today()));
    assert!(!QuickPeriod::Week.contains(date(2025, 3, 17), today()));
    assert_eq!(week_bounds(today()), (date(2025, 3, 10), date(2025, 3, 16)));
    assert_eq!("amanhã".parse::<QuickPeriod>(), Ok(QuickPeriod::Tomorrow));
}

#[test]
fn test_period_overrides_date_range() {
    let filter = TaskFilter {
        period: Some(QuickPeriod::Today),
        date_from: Some(date(2025, 3, 20)),
        ..TaskFilter::default()
    };
    assert_eq!(ids(&filter.apply(&sample(), &directory(), today())), vec![1]);
}

#[test]
fn test_date_range_is_inclusive() {
    let filter = TaskFilter {
        date_from: Some(date(2025, 3, 13)),
        date_to: Some(date(2025, 3, 20)),
        ..TaskFilter::default()
    };
    assert_eq!(ids(&filter.apply(&sample(), &directory(), today())), vec![2, 3]);
}

#[test]
fn test_id_sets() {
    let dir = directory();
    let tasks = sample();

    let by_client = TaskFilter { clients: vec![1], ..TaskFilter::default() };
    assert_eq!(ids(&by_client.apply(&tasks, &dir, today())), vec![1]);

    let by_staff = TaskFilter { employees: vec![5, 6], ..TaskFilter::default() };
    assert_eq!(ids(&by_staff.apply(&tasks, &dir, today())), vec![2]);

    let by_type = TaskFilter { task_types: vec![9], clients: vec![2], ..TaskFilter::default() };
    assert!(by_type.apply(&tasks, &dir, today()).is_empty());
}

#[test]
fn test_active_count() {
    let filter = TaskFilter {
        search: Some("x".into()),
        period: Some(QuickPeriod::Week),
        date_from: Some(today()),
        date_to: Some(today()),
        clients: vec![1, 2],
        employees: vec![5],
        ..TaskFilter::default()
    };
    assert_eq!(filter.active_count(), 5);
    assert_eq!(TaskFilter::default().active_count(), 0);
}

#[test]
fn test_sort_by_deadline() {
    let now = Utc.with_ymd_and_hms(2025, 3, 12, 12, 0, 0).unwrap();
    let mut a = task(1, "late deadline", date(2025, 3, 1));
    a.deadline = Some(now + Duration::days(3));
    let mut b = task(2, "soon deadline", date(2025, 3, 30));
    b.deadline = Some(now + Duration::hours(2));
    let c = task(3, "no deadline, later", date(2025, 3, 20));
    let d = task(4, "no deadline, earlier", date(2025, 3, 14));

    let mut tasks = vec![c, a, d, b];
    sort_by_deadline(&mut tasks);
    assert_eq!(tasks.iter().map(|t| t.id).collect::<Vec<_>>(), vec![2, 1, 4, 3]);
}
