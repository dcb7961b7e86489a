use std::io::{self, Write};

use chrono::{NaiveDate, NaiveTime};
use clap::Args;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use serde::Serialize;

use crate::calendar::{self, ViewMode};
use crate::deadline::{BadgeTone, ColorToken, ProgressBar};
use crate::error::{Error, Result};
use crate::filters::{Directory, QuickPeriod, TaskFilter};
use crate::models::{
    parse_hex_color, Client, Employee, PostKind, PostStatus, PostType, ScheduledPost, SocialNetwork,
    Task, TaskType, DEFAULT_COLOR, TASK_TYPE_ICONS,
};
use crate::schedule::{self, PostFilter, PostPlan};
use crate::session::{DeadlineView, Session};
use crate::storage::{Query, Record};

// ---------------------------------------------------------------------------
// Argument structs
// ---------------------------------------------------------------------------

#[derive(Args, Debug, Clone, Default)]
pub struct NewTask {
    /// Task description (quoted if it has spaces)
    pub description: String,
    /// Day of the job in YYYY-MM-DD
    #[arg(short, long)]
    pub date: String,
    /// Client id
    #[arg(short, long)]
    pub client: Option<u64>,
    /// Task type id
    #[arg(short = 't', long = "type")]
    pub task_type: Option<u64>,
    /// Staff member id
    #[arg(short, long)]
    pub staff: Option<u64>,
    /// Start time, HH:MM
    #[arg(long)]
    pub start: Option<String>,
    /// End time, HH:MM
    #[arg(long)]
    pub end: Option<String>,
    #[arg(short, long)]
    pub location: Option<String>,
    /// Link to the delivered gallery
    #[arg(long)]
    pub gallery: Option<String>,
    /// Delivery deadline, e.g. 2025-03-14T18:00
    #[arg(short = 'D', long)]
    pub deadline: Option<String>,
    #[arg(short, long)]
    pub notes: Option<String>,
    /// Countdown alert window in hours
    #[arg(short = 'w', long)]
    pub alert_window: Option<f64>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct TaskEdit {
    #[arg(long)]
    pub description: Option<String>,
    #[arg(short, long)]
    pub date: Option<String>,
    #[arg(short, long)]
    pub client: Option<u64>,
    /// Unassign the client
    #[arg(long, conflicts_with = "client")]
    pub clear_client: bool,
    #[arg(short = 't', long = "type")]
    pub task_type: Option<u64>,
    /// Remove the task type
    #[arg(long, conflicts_with = "task_type")]
    pub clear_type: bool,
    #[arg(short, long)]
    pub staff: Option<u64>,
    /// Unassign the staff member
    #[arg(long, conflicts_with = "staff")]
    pub clear_staff: bool,
    #[arg(long)]
    pub start: Option<String>,
    /// Remove the start time
    #[arg(long, conflicts_with = "start")]
    pub clear_start: bool,
    #[arg(long)]
    pub end: Option<String>,
    /// Remove the end time
    #[arg(long, conflicts_with = "end")]
    pub clear_end: bool,
    #[arg(short, long)]
    pub location: Option<String>,
    #[arg(long)]
    pub gallery: Option<String>,
    #[arg(short = 'D', long)]
    pub deadline: Option<String>,
    /// Remove the delivery deadline
    #[arg(long, conflicts_with = "deadline")]
    pub clear_deadline: bool,
    #[arg(short, long)]
    pub notes: Option<String>,
    #[arg(short = 'w', long)]
    pub alert_window: Option<f64>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct TaskListArgs {
    /// Include completed tasks
    #[arg(short, long)]
    pub all: bool,
    /// Search description, client, staff and location
    #[arg(short = 'q', long)]
    pub search: Option<String>,
    /// today, tomorrow or week (overrides --from/--to)
    #[arg(short, long)]
    pub period: Option<QuickPeriod>,
    #[arg(long)]
    pub from: Option<NaiveDate>,
    #[arg(long)]
    pub to: Option<NaiveDate>,
    /// Only these clients (repeatable)
    #[arg(short, long)]
    pub client: Vec<u64>,
    /// Only these task types (repeatable)
    #[arg(short = 't', long = "type")]
    pub task_type: Vec<u64>,
    /// Only these staff members (repeatable)
    #[arg(short, long)]
    pub staff: Vec<u64>,
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl From<&TaskListArgs> for TaskFilter {
    fn from(args: &TaskListArgs) -> Self {
        TaskFilter {
            search: args.search.clone(),
            period: args.period,
            date_from: args.from,
            date_to: args.to,
            clients: args.client.clone(),
            task_types: args.task_type.clone(),
            employees: args.staff.clone(),
            hide_completed: !args.all,
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct NewClient {
    pub name: String,
    #[arg(short, long)]
    pub email: Option<String>,
    #[arg(short, long)]
    pub phone: Option<String>,
    #[arg(short, long)]
    pub company: Option<String>,
    #[arg(short, long)]
    pub notes: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ClientEdit {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(short, long)]
    pub email: Option<String>,
    #[arg(short, long)]
    pub phone: Option<String>,
    #[arg(short, long)]
    pub company: Option<String>,
    #[arg(short, long)]
    pub notes: Option<String>,
    /// Mark active or inactive
    #[arg(long)]
    pub active: Option<bool>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct NewEmployee {
    pub name: String,
    #[arg(short, long)]
    pub email: Option<String>,
    #[arg(short, long)]
    pub phone: Option<String>,
    /// Job title
    #[arg(short, long)]
    pub role: Option<String>,
    /// Calendar colour, #rrggbb
    #[arg(short, long)]
    pub color: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct EmployeeEdit {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(short, long)]
    pub email: Option<String>,
    #[arg(short, long)]
    pub phone: Option<String>,
    #[arg(short, long)]
    pub role: Option<String>,
    #[arg(short, long)]
    pub color: Option<String>,
    #[arg(long)]
    pub active: Option<bool>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct NewTaskType {
    pub name: String,
    /// Calendar colour, #rrggbb
    #[arg(short, long)]
    pub color: Option<String>,
    /// camera, video, image, film, briefcase, users, package, calendar, star or heart
    #[arg(short, long)]
    pub icon: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct TaskTypeEdit {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(short, long)]
    pub color: Option<String>,
    #[arg(short, long)]
    pub icon: Option<String>,
    #[arg(long)]
    pub active: Option<bool>,
}

#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    /// Client id
    #[arg(short, long)]
    pub client: u64,
    /// Networks, comma separated (instagram,facebook,tiktok,youtube,linkedin,x)
    #[arg(short, long, value_delimiter = ',', required = true)]
    pub networks: Vec<SocialNetwork>,
    #[arg(short, long, default_value = "Reel")]
    pub kind: PostKind,
    /// Staff member responsible
    #[arg(short, long)]
    pub owner: Option<u64>,
    /// Time of day, HH:MM
    #[arg(long, default_value = "10:00")]
    pub time: String,
    /// First day, YYYY-MM-DD
    #[arg(long)]
    pub from: NaiveDate,
    /// Last day, YYYY-MM-DD
    #[arg(long)]
    pub to: NaiveDate,
    /// Weekdays, comma separated (mon..sun or seg..dom)
    #[arg(short, long, default_value = "mon,wed,fri")]
    pub weekdays: String,
}

#[derive(Args, Debug, Clone, Default)]
pub struct PostListArgs {
    #[arg(short, long)]
    pub status: Option<PostStatus>,
    #[arg(short, long)]
    pub client: Option<u64>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct PostEdit {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub caption: Option<String>,
    #[arg(long)]
    pub media: Option<String>,
    #[arg(short, long)]
    pub status: Option<PostStatus>,
    /// New date and time, e.g. 2025-03-14T10:00
    #[arg(long)]
    pub at: Option<String>,
}

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| Error::Invalid(format!("date '{}': {}. Use YYYY-MM-DD.", raw, e)))
}

fn parse_time(raw: &str) -> Result<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|e| Error::Invalid(format!("time '{}': {}. Use HH:MM.", raw, e)))
}

fn parse_deadline(session: &Session, raw: &str) -> Result<chrono::DateTime<chrono::Utc>> {
    session
        .parse_timestamp(raw)
        .ok_or_else(|| Error::Invalid(format!("deadline '{}'. Use YYYY-MM-DDTHH:MM.", raw)))
}

fn check_window(hours: Option<f64>) -> Result<Option<f64>> {
    match hours {
        Some(h) if !h.is_finite() || h < 0.0 => {
            Err(Error::Invalid(format!("alert window must be a non-negative number of hours, got {}", h)))
        }
        other => Ok(other),
    }
}

fn check_color(raw: Option<String>) -> Result<Option<String>> {
    match raw {
        Some(c) if parse_hex_color(&c).is_none() => Err(Error::Invalid(format!("colour '{}'. Use #rrggbb.", c))),
        other => Ok(other),
    }
}

fn check_icon(raw: Option<String>) -> Result<Option<String>> {
    match raw {
        Some(i) if !TASK_TYPE_ICONS.contains(&i.as_str()) => Err(Error::Invalid(format!(
            "icon '{}'. Choose one of: {}",
            i,
            TASK_TYPE_ICONS.join(", ")
        ))),
        other => Ok(other),
    }
}

fn check_name(raw: &str) -> Result<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(Error::Invalid("name must not be empty".into()));
    }
    Ok(name.to_string())
}

/// Fails with `NotFound` when a referenced row does not exist.
fn ensure_exists<R: Record>(session: &Session, id: Option<u64>) -> Result<Option<u64>> {
    if let Some(id) = id {
        session.store.get::<R>(id)?;
    }
    Ok(id)
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Adds a new task.
pub fn cmd_task_add(session: &Session, args: NewTask, silent: bool) -> Result<Task> {
    let description = args.description.trim().to_string();
    if description.is_empty() {
        return Err(Error::Invalid("description must not be empty".into()));
    }
    let task = Task {
        id: 0,
        description,
        client_id: ensure_exists::<Client>(session, args.client)?,
        task_type_id: ensure_exists::<TaskType>(session, args.task_type)?,
        employee_id: ensure_exists::<Employee>(session, args.staff)?,
        due_date: parse_date(&args.date)?,
        start_time: args.start.as_deref().map(parse_time).transpose()?,
        end_time: args.end.as_deref().map(parse_time).transpose()?,
        location: non_empty(args.location),
        gallery_link: non_empty(args.gallery),
        deadline: args.deadline.as_deref().map(|d| parse_deadline(session, d)).transpose()?,
        completed: false,
        notes: non_empty(args.notes),
        alert_window_hours: check_window(args.alert_window)?,
        created_at: session.now(),
    };

    let task = session.store.insert(task)?;
    if !silent {
        println!("Task added (id = {})", task.id);
    }
    Ok(task)
}

/// Edits an existing task's details.
pub fn cmd_task_edit(session: &Session, id: u64, args: TaskEdit, silent: bool) -> Result<Task> {
    let mut task = session.store.get::<Task>(id)?;

    if let Some(d) = args.description {
        task.description = check_name(&d)?;
    }
    if let Some(d) = args.date {
        task.due_date = parse_date(&d)?;
    }
    if args.client.is_some() {
        task.client_id = ensure_exists::<Client>(session, args.client)?;
    }
    if args.task_type.is_some() {
        task.task_type_id = ensure_exists::<TaskType>(session, args.task_type)?;
    }
    if args.staff.is_some() {
        task.employee_id = ensure_exists::<Employee>(session, args.staff)?;
    }
    if let Some(t) = args.start {
        task.start_time = Some(parse_time(&t)?);
    }
    if let Some(t) = args.end {
        task.end_time = Some(parse_time(&t)?);
    }
    if let Some(l) = args.location {
        task.location = non_empty(Some(l));
    }
    if let Some(g) = args.gallery {
        task.gallery_link = non_empty(Some(g));
    }
    if let Some(n) = args.notes {
        task.notes = non_empty(Some(n));
    }
    if let Some(d) = args.deadline {
        task.deadline = Some(parse_deadline(session, &d)?);
    }
    if args.clear_deadline {
        task.deadline = None;
    }
    if args.clear_client {
        task.client_id = None;
    }
    if args.clear_type {
        task.task_type_id = None;
    }
    if args.clear_staff {
        task.employee_id = None;
    }
    if args.clear_start {
        task.start_time = None;
    }
    if args.clear_end {
        task.end_time = None;
    }
    if args.alert_window.is_some() {
        task.alert_window_hours = check_window(args.alert_window)?;
    }

    let task = session.store.update(&task)?;
    if !silent {
        println!("Task {} updated.", id);
    }
    Ok(task)
}

/// Marks a task done or not done.
pub fn cmd_task_set_completed(session: &Session, id: u64, completed: bool, silent: bool) -> Result<Task> {
    let task = session.store.modify::<Task>(id, |t| t.completed = completed)?;
    if !silent {
        if completed {
            println!("Task {} marked as complete.", id);
        } else {
            println!("Task {} reopened.", id);
        }
    }
    Ok(task)
}

/// Flips a task's completion flag.
pub fn cmd_task_toggle(session: &Session, id: u64, silent: bool) -> Result<Task> {
    let current = session.store.get::<Task>(id)?;
    cmd_task_set_completed(session, id, !current.completed, silent)
}

/// Removes a task by ID.
pub fn cmd_task_remove(session: &Session, id: u64, silent: bool) -> Result<()> {
    session.store.delete::<Task>(id)?;
    if !silent {
        println!("Task {} removed.", id);
    }
    Ok(())
}

#[derive(Serialize)]
struct TaskRow<'a> {
    #[serde(flatten)]
    task: &'a Task,
    client: Option<&'a str>,
    staff: Option<&'a str>,
    #[serde(flatten)]
    deadline: DeadlineView,
}

/// Lists tasks in a table, soonest deadline first.
pub fn cmd_task_list(session: &Session, args: &TaskListArgs) -> Result<Vec<Task>> {
    let dir = Directory::load(&session.store)?;
    let tasks: Vec<Task> = session.store.select(&Query::new().order_by("due_date", true))?;
    let tasks = TaskFilter::from(args).apply(&tasks, &dir, session.today());

    if args.json {
        let rows: Vec<TaskRow> = tasks
            .iter()
            .map(|t| TaskRow {
                task: t,
                client: dir.client_name(t.client_id),
                staff: dir.employee_name(t.employee_id),
                deadline: session.deadline_view(t),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(tasks);
    }

    if tasks.is_empty() {
        println!("No tasks found.");
        return Ok(tasks);
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(bold_header(&["ID", "Description", "Client", "Type", "Date", "Deadline", "Time Left", "Progress", "Staff"]));

    let zone = session.zone();
    for t in &tasks {
        let view = session.deadline_view(t);
        let kind = dir.task_type(t.task_type_id);

        let mut description = t.description.clone();
        if let Some(badge) = view.urgency.badge() {
            description = format!("{} [{}]", description, badge.label);
        }
        let description_cell = match view.urgency.badge().map(|b| b.tone) {
            _ if t.completed => Cell::new(description).add_attribute(Attribute::CrossedOut).fg(Color::Grey),
            Some(BadgeTone::Danger) => Cell::new(description).fg(Color::Red),
            Some(BadgeTone::Warning) => Cell::new(description).fg(Color::Yellow),
            None => Cell::new(description),
        };

        let date = match t.start_time {
            Some(start) => format!("{} {}", t.due_date.format("%d/%m/%Y"), start.format("%H:%M")),
            None => t.due_date.format("%d/%m/%Y").to_string(),
        };
        let deadline = t
            .deadline
            .map(|d| zone.localize(d).format("%d/%m %H:%M").to_string())
            .unwrap_or_default();
        let left = if t.completed {
            String::new()
        } else {
            view.relative.clone().unwrap_or_default()
        };

        table.add_row(vec![
            Cell::new(t.id),
            description_cell,
            Cell::new(dir.client_name(t.client_id).unwrap_or_default()),
            match kind {
                Some(k) => Cell::new(&k.name).fg(hex_color(&k.color)),
                None => Cell::new(""),
            },
            Cell::new(date),
            Cell::new(deadline),
            Cell::new(left),
            progress_cell(t.deadline.is_some(), &view.progress),
            Cell::new(dir.employee_name(t.employee_id).unwrap_or_default()),
        ]);
    }

    println!("{table}");
    Ok(tasks)
}

/// Prints every field of one task plus its deadline status.
pub fn cmd_task_show(session: &Session, id: u64) -> Result<Task> {
    let task = session.store.get::<Task>(id)?;
    let dir = Directory::load(&session.store)?;
    let view = session.deadline_view(&task);
    let zone = session.zone();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    let mut row = |k: &str, v: String| {
        table.add_row(vec![Cell::new(k).add_attribute(Attribute::Bold), Cell::new(v)]);
    };
    row("ID", task.id.to_string());
    row("Description", task.description.clone());
    row("Client", dir.client_name(task.client_id).unwrap_or("-").to_string());
    row("Type", dir.task_type(task.task_type_id).map(|k| k.name.clone()).unwrap_or_else(|| "-".into()));
    row("Staff", dir.employee_name(task.employee_id).unwrap_or("-").to_string());
    row("Date", task.due_date.to_string());
    row(
        "Time",
        match (task.start_time, task.end_time) {
            (Some(s), Some(e)) => format!("{} - {}", s.format("%H:%M"), e.format("%H:%M")),
            (Some(s), None) => s.format("%H:%M").to_string(),
            _ => "-".into(),
        },
    );
    row("Location", task.location.clone().unwrap_or_else(|| "-".into()));
    row("Gallery", task.gallery_link.clone().unwrap_or_else(|| "-".into()));
    row(
        "Deadline",
        task.deadline
            .map(|d| zone.localize(d).format("%d/%m/%Y %H:%M").to_string())
            .unwrap_or_else(|| "-".into()),
    );
    row("Status", view.urgency.label.unwrap_or("-").to_string());
    row("Time left", view.relative.unwrap_or_else(|| "-".into()));
    row("Progress", format!("{}% ({})", view.progress.percent, view.progress.color));
    row("Notes", task.notes.clone().unwrap_or_else(|| "-".into()));

    println!("{table}");
    Ok(task)
}

// ---------------------------------------------------------------------------
// Clients, staff and task types
// ---------------------------------------------------------------------------

fn active_query(all: bool) -> Query {
    let query = Query::new().order_by("name", true);
    if all { query } else { query.eq("active", true) }
}

pub fn cmd_client_add(session: &Session, args: NewClient, silent: bool) -> Result<Client> {
    let client = session.store.insert(Client {
        id: 0,
        name: check_name(&args.name)?,
        email: non_empty(args.email),
        phone: non_empty(args.phone),
        company: non_empty(args.company),
        notes: non_empty(args.notes),
        active: true,
        created_at: session.now(),
    })?;
    if !silent {
        println!("Client '{}' added (id = {}).", client.name, client.id);
    }
    Ok(client)
}

pub fn cmd_client_edit(session: &Session, id: u64, args: ClientEdit, silent: bool) -> Result<Client> {
    let name = args.name.as_deref().map(check_name).transpose()?;
    let client = session.store.modify::<Client>(id, |c| {
        if let Some(n) = name {
            c.name = n;
        }
        if let Some(e) = args.email {
            c.email = non_empty(Some(e));
        }
        if let Some(p) = args.phone {
            c.phone = non_empty(Some(p));
        }
        if let Some(co) = args.company {
            c.company = non_empty(Some(co));
        }
        if let Some(n) = args.notes {
            c.notes = non_empty(Some(n));
        }
        if let Some(a) = args.active {
            c.active = a;
        }
    })?;
    if !silent {
        println!("Client {} updated.", id);
    }
    Ok(client)
}

pub fn cmd_client_list(session: &Session, all: bool) -> Result<Vec<Client>> {
    let clients: Vec<Client> = session.store.select(&active_query(all))?;
    if clients.is_empty() {
        println!("No clients found.");
        return Ok(clients);
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(bold_header(&["ID", "Name", "Company", "Email", "Phone", "Active"]));
    for c in &clients {
        table.add_row(vec![
            Cell::new(c.id),
            Cell::new(&c.name),
            Cell::new(c.company.as_deref().unwrap_or("-")),
            Cell::new(c.email.as_deref().unwrap_or("-")),
            Cell::new(c.phone.as_deref().unwrap_or("-")),
            active_cell(c.active),
        ]);
    }
    println!("{table}");
    Ok(clients)
}

/// Removes a client, its posts, and the client reference of its tasks.
pub fn cmd_client_remove(session: &Session, id: u64, silent: bool) -> Result<()> {
    session.store.delete::<Client>(id)?;

    let posts: Vec<ScheduledPost> = session.store.select(&Query::new().eq("client_id", id))?;
    for post in &posts {
        session.store.delete::<ScheduledPost>(post.id)?;
    }
    let tasks: Vec<Task> = session.store.select(&Query::new().eq("client_id", id))?;
    for mut task in tasks {
        task.client_id = None;
        session.store.update(&task)?;
    }

    if !posts.is_empty() {
        tracing::warn!(client = id, posts = posts.len(), "removed posts of deleted client");
    }
    if !silent {
        println!("Client {} removed.", id);
    }
    Ok(())
}

pub fn cmd_staff_add(session: &Session, args: NewEmployee, silent: bool) -> Result<Employee> {
    let employee = session.store.insert(Employee {
        id: 0,
        name: check_name(&args.name)?,
        email: non_empty(args.email),
        phone: non_empty(args.phone),
        role: non_empty(args.role),
        color: check_color(args.color)?.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
        active: true,
        created_at: session.now(),
    })?;
    if !silent {
        println!("Staff member '{}' added (id = {}).", employee.name, employee.id);
    }
    Ok(employee)
}

pub fn cmd_staff_edit(session: &Session, id: u64, args: EmployeeEdit, silent: bool) -> Result<Employee> {
    let name = args.name.as_deref().map(check_name).transpose()?;
    let color = check_color(args.color)?;
    let employee = session.store.modify::<Employee>(id, |e| {
        if let Some(n) = name {
            e.name = n;
        }
        if let Some(m) = args.email {
            e.email = non_empty(Some(m));
        }
        if let Some(p) = args.phone {
            e.phone = non_empty(Some(p));
        }
        if let Some(r) = args.role {
            e.role = non_empty(Some(r));
        }
        if let Some(c) = color {
            e.color = c;
        }
        if let Some(a) = args.active {
            e.active = a;
        }
    })?;
    if !silent {
        println!("Staff member {} updated.", id);
    }
    Ok(employee)
}

pub fn cmd_staff_list(session: &Session, all: bool) -> Result<Vec<Employee>> {
    let staff: Vec<Employee> = session.store.select(&active_query(all))?;
    if staff.is_empty() {
        println!("No staff found.");
        return Ok(staff);
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(bold_header(&["ID", "Name", "Role", "Email", "Phone", "Active"]));
    for e in &staff {
        table.add_row(vec![
            Cell::new(e.id),
            Cell::new(&e.name).fg(hex_color(&e.color)),
            Cell::new(e.role.as_deref().unwrap_or("-")),
            Cell::new(e.email.as_deref().unwrap_or("-")),
            Cell::new(e.phone.as_deref().unwrap_or("-")),
            active_cell(e.active),
        ]);
    }
    println!("{table}");
    Ok(staff)
}

/// Removes a staff member and unassigns their tasks and posts.
pub fn cmd_staff_remove(session: &Session, id: u64, silent: bool) -> Result<()> {
    session.store.delete::<Employee>(id)?;

    let tasks: Vec<Task> = session.store.select(&Query::new().eq("employee_id", id))?;
    for mut task in tasks {
        task.employee_id = None;
        session.store.update(&task)?;
    }
    let posts: Vec<ScheduledPost> = session.store.select(&Query::new().eq("owner_id", id))?;
    for mut post in posts {
        post.owner_id = None;
        session.store.update(&post)?;
    }

    if !silent {
        println!("Staff member {} removed.", id);
    }
    Ok(())
}

pub fn cmd_type_add(session: &Session, args: NewTaskType, silent: bool) -> Result<TaskType> {
    let kind = session.store.insert(TaskType {
        id: 0,
        name: check_name(&args.name)?,
        color: check_color(args.color)?.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
        icon: check_icon(args.icon)?.unwrap_or_else(|| TASK_TYPE_ICONS[0].to_string()),
        active: true,
        created_at: session.now(),
    })?;
    if !silent {
        println!("Task type '{}' added (id = {}).", kind.name, kind.id);
    }
    Ok(kind)
}

pub fn cmd_type_edit(session: &Session, id: u64, args: TaskTypeEdit, silent: bool) -> Result<TaskType> {
    let name = args.name.as_deref().map(check_name).transpose()?;
    let color = check_color(args.color)?;
    let icon = check_icon(args.icon)?;
    let kind = session.store.modify::<TaskType>(id, |k| {
        if let Some(n) = name {
            k.name = n;
        }
        if let Some(c) = color {
            k.color = c;
        }
        if let Some(i) = icon {
            k.icon = i;
        }
        if let Some(a) = args.active {
            k.active = a;
        }
    })?;
    if !silent {
        println!("Task type {} updated.", id);
    }
    Ok(kind)
}

pub fn cmd_type_list(session: &Session, all: bool) -> Result<Vec<TaskType>> {
    let kinds: Vec<TaskType> = session.store.select(&active_query(all))?;
    if kinds.is_empty() {
        println!("No task types found.");
        return Ok(kinds);
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(bold_header(&["ID", "Name", "Icon", "Colour", "Active"]));
    for k in &kinds {
        table.add_row(vec![
            Cell::new(k.id),
            Cell::new(&k.name).fg(hex_color(&k.color)),
            Cell::new(&k.icon),
            Cell::new(&k.color),
            active_cell(k.active),
        ]);
    }
    println!("{table}");
    Ok(kinds)
}

/// Removes a task type and clears it from tasks that used it.
pub fn cmd_type_remove(session: &Session, id: u64, silent: bool) -> Result<()> {
    session.store.delete::<TaskType>(id)?;
    let tasks: Vec<Task> = session.store.select(&Query::new().eq("task_type_id", id))?;
    for mut task in tasks {
        task.task_type_id = None;
        session.store.update(&task)?;
    }
    if !silent {
        println!("Task type {} removed.", id);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Posting calendar
// ---------------------------------------------------------------------------

/// Expands a bulk plan into posts and stores them in one write.
pub fn cmd_post_plan(session: &Session, args: PlanArgs, silent: bool) -> Result<Vec<ScheduledPost>> {
    let client = session.store.get::<Client>(args.client)?;
    let owner_id = ensure_exists::<Employee>(session, args.owner)?;
    let weekdays = schedule::parse_weekdays(&args.weekdays).map_err(Error::Invalid)?;

    let plan = PostPlan {
        client_id: client.id,
        client_name: client.name,
        networks: args.networks,
        kind: args.kind,
        owner_id,
        time: parse_time(&args.time)?,
        start: args.from,
        end: args.to,
        weekdays,
        zone: session.zone(),
    };
    let posts = schedule::generate(&plan, session.now())?;
    let posts = session.store.insert_many(posts)?;
    if !silent {
        println!("{} posts planned for '{}'.", posts.len(), plan.client_name);
    }
    Ok(posts)
}

/// Lists posts grouped by month.
pub fn cmd_post_list(session: &Session, args: &PostListArgs) -> Result<Vec<ScheduledPost>> {
    let posts: Vec<ScheduledPost> = session.store.select(&Query::new().order_by("scheduled_at", true))?;
    let filter = PostFilter { status: args.status, client_id: args.client };
    let posts = filter.apply(&posts);
    if posts.is_empty() {
        println!("No posts found.");
        return Ok(posts);
    }

    let dir = Directory::load(&session.store)?;
    let zone = session.zone();
    let locale = session.config.locale;
    for (month, group) in schedule::group_by_month(&posts, zone) {
        let title = NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d")
            .map(|d| calendar::title(ViewMode::Month, d, locale))
            .unwrap_or(month);
        println!("{} ({})", title, group.len());

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(bold_header(&["ID", "When", "Title", "Kind", "Networks", "Client", "Owner", "Status"]));
        for p in &group {
            let networks: Vec<String> = p.networks.iter().map(|n| n.to_string()).collect();
            table.add_row(vec![
                Cell::new(p.id),
                Cell::new(zone.localize(p.scheduled_at).format("%d/%m %H:%M")),
                Cell::new(&p.title),
                Cell::new(p.post_kind),
                Cell::new(networks.join(", ")),
                Cell::new(dir.client_name(Some(p.client_id)).unwrap_or("-")),
                Cell::new(dir.employee_name(p.owner_id).unwrap_or("-")),
                Cell::new(p.status).fg(hex_color(p.status.color())),
            ]);
        }
        println!("{table}");
    }
    Ok(posts)
}

pub fn cmd_post_edit(session: &Session, id: u64, args: PostEdit, silent: bool) -> Result<ScheduledPost> {
    let at = args.at.as_deref().map(|raw| parse_deadline(session, raw)).transpose()?;
    if let Some(title) = &args.title {
        check_name(title)?;
    }
    let post = session.store.modify::<ScheduledPost>(id, |p| {
        if let Some(t) = args.title {
            p.title = t.trim().to_string();
        }
        if let Some(c) = args.caption {
            p.caption = non_empty(Some(c));
        }
        if let Some(m) = args.media {
            p.media_link = non_empty(Some(m));
        }
        if let Some(s) = args.status {
            p.status = s;
        }
        if let Some(at) = at {
            p.scheduled_at = at;
        }
    })?;
    if !silent {
        println!("Post {} updated.", id);
    }
    Ok(post)
}

pub fn cmd_post_remove(session: &Session, id: u64, silent: bool) -> Result<()> {
    session.store.delete::<ScheduledPost>(id)?;
    if !silent {
        println!("Post {} removed.", id);
    }
    Ok(())
}

pub fn cmd_post_type_add(session: &Session, name: &str, silent: bool) -> Result<PostType> {
    let kind = session.store.insert(PostType { id: 0, name: check_name(name)?, active: true })?;
    if !silent {
        println!("Post type '{}' added (id = {}).", kind.name, kind.id);
    }
    Ok(kind)
}

pub fn cmd_post_type_list(session: &Session) -> Result<Vec<PostType>> {
    let kinds: Vec<PostType> = session.store.select(&active_query(false))?;
    if kinds.is_empty() {
        println!("No post types found.");
        return Ok(kinds);
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(bold_header(&["ID", "Name"]));
    for k in &kinds {
        table.add_row(vec![Cell::new(k.id), Cell::new(&k.name)]);
    }
    println!("{table}");
    Ok(kinds)
}

pub fn cmd_post_type_remove(session: &Session, id: u64, silent: bool) -> Result<()> {
    session.store.delete::<PostType>(id)?;
    if !silent {
        println!("Post type {} removed.", id);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Calendar
// ---------------------------------------------------------------------------

/// Prints tasks and posts for the days of a calendar view.
pub fn cmd_calendar(session: &Session, view: ViewMode, anchor: Option<NaiveDate>, filter: &TaskFilter) -> Result<()> {
    let anchor = anchor.unwrap_or_else(|| session.today());
    let locale = session.config.locale;
    let dir = Directory::load(&session.store)?;
    let tasks: Vec<Task> = session.store.all()?;
    let tasks = filter.apply(&tasks, &dir, session.today());
    let posts: Vec<ScheduledPost> = session.store.all()?;

    let by_day = calendar::tasks_by_day(&tasks);
    let posts_by_day = calendar::posts_by_day(&posts, session.zone());
    let days = calendar::days(view, anchor);

    println!("{}", calendar::title(view, anchor, locale));

    let cell_for = |day: NaiveDate, max_tasks: usize| -> Cell {
        let mut lines = vec![day.format("%d").to_string()];
        let day_tasks = by_day.get(&day).map(Vec::as_slice).unwrap_or_default();
        for t in day_tasks.iter().take(max_tasks) {
            let urgency = session.deadline_view(t).urgency;
            let marker = match urgency.badge() {
                Some(b) => format!(" !{}", b.label),
                None => String::new(),
            };
            lines.push(format!("• {}{}", t.description, marker));
        }
        if day_tasks.len() > max_tasks {
            lines.push(format!("+{}", day_tasks.len() - max_tasks));
        }
        if let Some(day_posts) = posts_by_day.get(&day) {
            lines.push(format!("{} post(s)", day_posts.len()));
        }
        let cell = Cell::new(lines.join("\n"));
        if day == session.today() {
            cell.add_attribute(Attribute::Bold).fg(Color::Cyan)
        } else {
            cell
        }
    };

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_content_arrangement(ContentArrangement::Dynamic);
    match view {
        ViewMode::Month | ViewMode::Week => {
            let header: Vec<&str> = days.iter().take(7).map(|d| locale.weekday_short(chrono::Datelike::weekday(d))).collect();
            table.set_header(bold_header(&header));
            let max_tasks = if view == ViewMode::Month { 3 } else { 20 };
            for week in days.chunks(7) {
                table.add_row(week.iter().map(|d| cell_for(*d, max_tasks)).collect::<Vec<_>>());
            }
        }
        ViewMode::Weekend | ViewMode::Day => {
            let header: Vec<&str> = days.iter().map(|d| locale.weekday_short(chrono::Datelike::weekday(d))).collect();
            table.set_header(bold_header(&header));
            table.add_row(days.iter().map(|d| cell_for(*d, 20)).collect::<Vec<_>>());
        }
    }
    println!("{table}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Maintenance
// ---------------------------------------------------------------------------

/// Deletes every table after confirmation.
pub fn cmd_reset(session: &Session, force: bool) -> Result<()> {
    if !force {
        print!("Are you sure you want to delete all tasks, clients, staff and posts? This cannot be undone. [y/N] ");
        io::stdout().flush()?;
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if input.trim().to_lowercase() != "y" {
            println!("Aborted.");
            return Ok(());
        }
    }
    session.store.reset()?;
    println!("Database reset successfully.");
    Ok(())
}

// ---------------------------------------------------------------------------
// Table helpers
// ---------------------------------------------------------------------------

fn bold_header(names: &[&str]) -> Vec<Cell> {
    names.iter().map(|n| Cell::new(n).add_attribute(Attribute::Bold)).collect()
}

fn active_cell(active: bool) -> Cell {
    if active {
        Cell::new("yes").fg(Color::Green)
    } else {
        Cell::new("no").fg(Color::Grey)
    }
}

fn hex_color(hex: &str) -> Color {
    match parse_hex_color(hex) {
        Some((r, g, b)) => Color::Rgb { r, g, b },
        None => Color::Reset,
    }
}

fn token_color(token: ColorToken) -> Color {
    let (r, g, b) = token.rgb();
    Color::Rgb { r, g, b }
}

/// Text progress bar, `width` cells wide.
pub fn bar_text(percent: u8, width: usize) -> String {
    let filled = (percent.min(100) as usize * width + 50) / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn progress_cell(has_deadline: bool, bar: &ProgressBar) -> Cell {
    if !has_deadline {
        return Cell::new("");
    }
    Cell::new(format!("{} {:>3}%", bar_text(bar.percent, 10), bar.percent)).fg(token_color(bar.color))
}
