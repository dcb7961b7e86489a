//! # studiocal
//!
//! Terminal calendar for a photo and video studio: tasks with delivery
//! deadlines, clients, staff, task types and a social-media posting plan.
//!
//! ## Usage
//!
//! Run without arguments to open the interactive dashboard:
//!
//! ```bash
//! studiocal
//! # wall display, read-only
//! studiocal tv
//! ```
//!
//! **Tasks**
//! ```bash
//! studiocal task add "Ensaio gestante" --date 2025-03-14 --client 1 --deadline 2025-03-20T18:00
//! studiocal task list --period week
//! studiocal task done 3
//! ```
//!
//! **Posting plan**
//! ```bash
//! studiocal post plan --client 1 --networks instagram,tiktok --from 2025-03-01 --to 2025-03-31
//! studiocal post list --status planned
//! ```
//!
//! ## Data Storage
//!
//! Tables are JSON files in `~/.local/share/studiocal/` (or the platform's
//! equivalent). Override with `STUDIOCAL_DATA`. Log filtering follows
//! `STUDIOCAL_LOG`.

use std::io;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};

use studiocal::calendar::ViewMode;
use studiocal::commands::*;
use studiocal::filters::TaskFilter;
use studiocal::models::PostStatus;
use studiocal::tui::{run_tui, Mode};
use studiocal::{Result, Session};

#[derive(Parser)]
#[command(name = "studiocal")]
#[command(about = "Studio task calendar with deadline alerts", long_about = None)]
struct Cli {
    /// Debug logging on stderr
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage tasks
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Manage clients
    Client {
        #[command(subcommand)]
        command: ClientCommands,
    },
    /// Manage staff
    Staff {
        #[command(subcommand)]
        command: StaffCommands,
    },
    /// Manage task types
    Type {
        #[command(subcommand)]
        command: TypeCommands,
    },
    /// Social-media posting plan
    Post {
        #[command(subcommand)]
        command: PostCommands,
    },
    /// Print a calendar of tasks and posts
    Calendar {
        /// month, week, weekend or day
        #[arg(short, long, default_value = "month")]
        view: ViewMode,
        /// Any day inside the period to show (defaults to today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
        #[arg(short, long)]
        client: Vec<u64>,
        #[arg(short, long)]
        staff: Vec<u64>,
        #[arg(short = 't', long = "type")]
        task_type: Vec<u64>,
        /// Include completed tasks
        #[arg(short, long)]
        all: bool,
    },
    /// Open the interactive dashboard
    Ui,
    /// Open the read-only wall display
    Tv,
    /// Reset the database (delete every table)
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Generate shell completions
    Completions {
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum TaskCommands {
    /// Add a new task
    Add(NewTask),
    /// List tasks, soonest deadline first
    List(TaskListArgs),
    /// Show one task in full
    Show { id: u64 },
    /// Mark a task as complete
    Done { id: u64 },
    /// Mark a completed task as pending again
    Reopen { id: u64 },
    /// Edit a task
    Edit {
        id: u64,
        #[command(flatten)]
        changes: TaskEdit,
    },
    /// Remove a task
    Remove { id: u64 },
}

#[derive(Subcommand)]
enum ClientCommands {
    Add(NewClient),
    List {
        /// Include inactive clients
        #[arg(short, long)]
        all: bool,
    },
    Edit {
        id: u64,
        #[command(flatten)]
        changes: ClientEdit,
    },
    /// Remove a client and its scheduled posts
    Remove { id: u64 },
}

#[derive(Subcommand)]
enum StaffCommands {
    Add(NewEmployee),
    List {
        #[arg(short, long)]
        all: bool,
    },
    Edit {
        id: u64,
        #[command(flatten)]
        changes: EmployeeEdit,
    },
    Remove { id: u64 },
}

#[derive(Subcommand)]
enum TypeCommands {
    Add(NewTaskType),
    List {
        #[arg(short, long)]
        all: bool,
    },
    Edit {
        id: u64,
        #[command(flatten)]
        changes: TaskTypeEdit,
    },
    Remove { id: u64 },
}

#[derive(Subcommand)]
enum PostCommands {
    /// Create posts for every matching weekday and network in a date range
    Plan(PlanArgs),
    /// List posts grouped by month
    List(PostListArgs),
    Edit {
        id: u64,
        #[command(flatten)]
        changes: PostEdit,
    },
    /// Move a post through Planejado, Em Produção, Aprovado, Postado
    Status { id: u64, status: PostStatus },
    Remove { id: u64 },
    /// Add a named post type
    TypeAdd { name: String },
    TypeList,
    TypeRemove { id: u64 },
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_env("STUDIOCAL_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
    {
        eprintln!("failed to initialize logging: {}", e);
    }
}

fn run(command: Option<Commands>) -> Result<()> {
    if let Some(Commands::Completions { shell }) = &command {
        let mut cmd = Cli::command();
        generate(*shell, &mut cmd, "studiocal", &mut io::stdout());
        return Ok(());
    }

    let session = Session::open_default()?;
    match command {
        Some(Commands::Task { command }) => match command {
            TaskCommands::Add(args) => cmd_task_add(&session, args, false).map(drop),
            TaskCommands::List(args) => cmd_task_list(&session, &args).map(drop),
            TaskCommands::Show { id } => cmd_task_show(&session, id).map(drop),
            TaskCommands::Done { id } => cmd_task_set_completed(&session, id, true, false).map(drop),
            TaskCommands::Reopen { id } => cmd_task_set_completed(&session, id, false, false).map(drop),
            TaskCommands::Edit { id, changes } => cmd_task_edit(&session, id, changes, false).map(drop),
            TaskCommands::Remove { id } => cmd_task_remove(&session, id, false),
        },
        Some(Commands::Client { command }) => match command {
            ClientCommands::Add(args) => cmd_client_add(&session, args, false).map(drop),
            ClientCommands::List { all } => cmd_client_list(&session, all).map(drop),
            ClientCommands::Edit { id, changes } => cmd_client_edit(&session, id, changes, false).map(drop),
            ClientCommands::Remove { id } => cmd_client_remove(&session, id, false),
        },
        Some(Commands::Staff { command }) => match command {
            StaffCommands::Add(args) => cmd_staff_add(&session, args, false).map(drop),
            StaffCommands::List { all } => cmd_staff_list(&session, all).map(drop),
            StaffCommands::Edit { id, changes } => cmd_staff_edit(&session, id, changes, false).map(drop),
            StaffCommands::Remove { id } => cmd_staff_remove(&session, id, false),
        },
        Some(Commands::Type { command }) => match command {
            TypeCommands::Add(args) => cmd_type_add(&session, args, false).map(drop),
            TypeCommands::List { all } => cmd_type_list(&session, all).map(drop),
            TypeCommands::Edit { id, changes } => cmd_type_edit(&session, id, changes, false).map(drop),
            TypeCommands::Remove { id } => cmd_type_remove(&session, id, false),
        },
        Some(Commands::Post { command }) => match command {
            PostCommands::Plan(args) => cmd_post_plan(&session, args, false).map(drop),
            PostCommands::List(args) => cmd_post_list(&session, &args).map(drop),
            PostCommands::Edit { id, changes } => cmd_post_edit(&session, id, changes, false).map(drop),
            PostCommands::Status { id, status } => {
                let changes = PostEdit { status: Some(status), ..PostEdit::default() };
                cmd_post_edit(&session, id, changes, false).map(drop)
            }
            PostCommands::Remove { id } => cmd_post_remove(&session, id, false),
            PostCommands::TypeAdd { name } => cmd_post_type_add(&session, &name, false).map(drop),
            PostCommands::TypeList => cmd_post_type_list(&session).map(drop),
            PostCommands::TypeRemove { id } => cmd_post_type_remove(&session, id, false),
        },
        Some(Commands::Calendar { view, date, client, staff, task_type, all }) => {
            let filter = TaskFilter {
                clients: client,
                employees: staff,
                task_types: task_type,
                hide_completed: !all,
                ..TaskFilter::default()
            };
            cmd_calendar(&session, view, date, &filter)
        }
        Some(Commands::Reset { force }) => cmd_reset(&session, force),
        Some(Commands::Tv) => run_tui(&session, Mode::Tv),
        Some(Commands::Ui) | None => run_tui(&session, Mode::Dashboard),
        Some(Commands::Completions { .. }) => Ok(()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
