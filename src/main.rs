use std::{path::PathBuf, sync::Arc};

use anyhow::bail;
use clap::{Parser, Subcommand};
use time::{Date, OffsetDateTime, macros::format_description};
use tokio::sync::RwLock;
use tracing_subscriber::EnvFilter;

use taskboard::{
    AuthSession, MemoryDb, Permission, StorageState, Stopwatch, Ticker,
    core::db::{
        NotificationRepository, Priority, ProjectRepository, ProjectStatus, Role, TaskRepository,
        TaskStatus, UserRepository,
    },
    filter::{Category, DateRange, TaskSort},
    timer::format_hms,
    views::{
        self, Lookup,
        kanban::{self, Move},
        navigation,
        projects::{DetailQuery, ProjectQuery},
        reports::{ExportFormat, ReportQuery},
        tasks::TaskQuery,
        users::UserQuery,
    },
};

#[derive(Parser)]
#[command(name = "taskboard")]
#[command(about = "Browse projects, tasks and time from the terminal")]
struct Cli {
    /// Sqlite file holding the signed-in user
    #[arg(long, value_name = "FILE", env = "TASKBOARD_STATE", default_value = "taskboard.db")]
    state: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Summary counters
    Dashboard,
    /// List projects
    Projects {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "all")]
        status: Category<ProjectStatus>,
    },
    /// One project with its tasks and subtasks
    Project {
        id: i64,
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "all")]
        status: Category<TaskStatus>,
    },
    /// List tasks
    Tasks {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "all")]
        status: Category<TaskStatus>,
        #[arg(long, default_value = "all")]
        priority: Category<Priority>,
        #[arg(long, default_value = "deadline")]
        sort: TaskSort,
    },
    /// One task with its subtasks and comments
    Task { id: i64 },
    /// Comment on a task as the signed-in user
    Comment { task: i64, text: String },
    /// Tasks grouped by status column
    Kanban,
    /// Move a task to another status
    Move { task: i64, status: TaskStatus },
    /// Run the stopwatch for a few seconds
    Timer {
        #[arg(long, default_value_t = 3)]
        seconds: u64,
        /// Book the session on this task
        #[arg(long)]
        task: Option<i64>,
        #[arg(long)]
        note: Option<String>,
    },
    /// Task distributions and logged hours
    Reports {
        #[arg(long, value_parser = parse_date)]
        from: Option<Date>,
        #[arg(long, value_parser = parse_date)]
        to: Option<Date>,
        #[arg(long, default_value = "all")]
        project: Category<i64>,
        #[arg(long)]
        export: Option<ExportFormat>,
    },
    /// List users
    Users {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "all")]
        role: Category<Role>,
    },
    /// Switch the signed-in role
    Role { role: Role },
    /// Sign in as the demo account for a role
    Login { role: Role },
    /// Sign out
    Logout,
    /// Sidebar entries for the signed-in user
    Nav,
}

fn parse_date(s: &str) -> Result<Date, time::error::Parse> {
    Date::parse(s, format_description!("[year]-[month]-[day]"))
}

fn require(session: &AuthSession<StorageState>, permission: Permission) -> anyhow::Result<()> {
    if !session.has_permission(permission) {
        match session.role() {
            Some(role) => bail!("role {role} lacks {permission:?}"),
            None => bail!("not signed in"),
        }
    }
    Ok(())
}

fn not_found(kind: &str, id: i64) {
    println!("{kind} {id} not found");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("TASKBOARD_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let storage = StorageState::new(&args.state).await?;
    let mut session = AuthSession::init(storage).await?;
    let db = MemoryDb::seeded();

    let result = run(args.command, &mut session, &db).await;
    session.store().close().await?;
    result
}

async fn run(
    command: Command,
    session: &mut AuthSession<StorageState>,
    db: &MemoryDb,
) -> anyhow::Result<()> {
    let now = OffsetDateTime::now_utc();
    match command {
        Command::Dashboard => {
            require(session, Permission::ViewTasks)?;
            let viewer = session.user().map(|u| u.name.clone());
            let stats = views::dashboard::load(db, viewer.as_deref(), now).await?;
            println!(
                "Tasks:        {} ({} completed, {}%)",
                stats.total_tasks, stats.completed_tasks, stats.completion_rate
            );
            println!("In progress:  {}", stats.in_progress_tasks);
            println!("Blocked:      {}", stats.blocked_tasks);
            println!("Overdue:      {}", stats.overdue_tasks);
            println!("Projects:     {} active", stats.active_projects);
            println!("Unread:       {}", stats.unread_notifications);
            if let Some(mine) = stats.my_open_tasks {
                println!("Assigned:     {mine} open");
            }
            let tasks = db.get_tasks().await?;
            for d in views::dashboard::status_series(&tasks) {
                println!("  {:<12} {}", d.name, d.value);
            }
            let projects = db.get_projects().await?;
            for c in views::dashboard::project_task_counts(&projects, &tasks) {
                println!("  {:<24} {}/{}", c.name, c.completed, c.tasks);
            }
            for n in db.get_notifications().await? {
                let marker = if n.unread { "*" } else { " " };
                println!("{marker} {} ({})", n.title, n.age);
            }
        }
        Command::Projects { search, status } => {
            require(session, Permission::ViewTasks)?;
            let query = ProjectQuery { text: search, status };
            for row in views::projects::list(db, &query, now).await? {
                let p = &row.project;
                println!(
                    "{:>3}  {:<24} {:<10} {:<7} {:>3}%  {} days",
                    p.id, p.name, p.status, p.priority, row.progress, row.days_left
                );
            }
        }
        Command::Project { id, search, status } => {
            require(session, Permission::ViewTasks)?;
            let query = DetailQuery { text: search, status };
            match views::projects::detail(db, id, &query, now).await? {
                Lookup::Found(detail) => {
                    let p = &detail.row.project;
                    println!("{} [{}] managed by {}", p.name, p.status, p.manager);
                    println!("{}", p.description);
                    println!("Tasks {}/{}", detail.tasks.len(), detail.total_tasks);
                    for t in &detail.tasks {
                        println!("  #{} {} [{}] {}", t.id, t.title, t.status, t.assignee);
                    }
                    println!("Subtasks {}/{}", detail.subtasks.len(), detail.total_subtasks);
                    for s in &detail.subtasks {
                        println!("  #{} {} [{}] {}", s.id, s.title, s.status, s.assignee);
                    }
                }
                Lookup::NotFound { kind, id } => not_found(kind, id),
            }
        }
        Command::Tasks { search, status, priority, sort } => {
            require(session, Permission::ViewTasks)?;
            let query = TaskQuery { text: search, status, priority, sort };
            for row in views::tasks::list(db, &query, now).await? {
                let t = &row.task;
                println!(
                    "{:>3}  {:<32} {:<11} {:<7} {:<14} {:>5.1}%  {} days",
                    t.id, t.title, t.status, t.priority, t.assignee, row.progress, row.days_left
                );
            }
        }
        Command::Task { id } => {
            require(session, Permission::ViewTasks)?;
            match views::tasks::detail(db, id).await? {
                Lookup::Found(t) => {
                    println!("#{} {} [{}] {}", t.id, t.title, t.status, t.assignee);
                    println!("{}", t.description);
                    for s in &t.subtasks {
                        println!("  #{} {} [{}] {}", s.id, s.title, s.status, s.assignee);
                    }
                    for c in &t.comments {
                        let edited = if c.edited { " (edited)" } else { "" };
                        println!("  {} at {}{edited}: {}", c.author, c.timestamp, c.content);
                    }
                }
                Lookup::NotFound { kind, id } => not_found(kind, id),
            }
        }
        Command::Comment { task, text } => {
            match views::tasks::add_comment(db, &*session, task, &text).await? {
                Lookup::Found(c) => println!("Comment #{} added to task {}", c.id, c.task_id),
                Lookup::NotFound { kind, id } => not_found(kind, id),
            }
        }
        Command::Kanban => {
            require(session, Permission::ViewTasks)?;
            for column in kanban::board(&db.get_tasks().await?) {
                println!("{} ({})", column.title, column.tasks.len());
                for t in &column.tasks {
                    let initials = kanban::initials(&t.assignee);
                    println!("  #{} {} [{}] {initials}", t.id, t.title, t.priority);
                }
            }
        }
        Command::Move { task, status } => {
            require(session, Permission::EditOwnTasks)?;
            match kanban::move_task(db, task, status).await? {
                Lookup::Found(Move::Moved { from, task }) => {
                    println!("#{} {} moved from {from} to {}", task.id, task.title, task.status)
                }
                Lookup::Found(Move::Unchanged(task)) => {
                    println!("#{} already {}", task.id, task.status)
                }
                Lookup::NotFound { kind, id } => not_found(kind, id),
            }
        }
        Command::Timer { seconds, task, note } => {
            require(session, Permission::TrackTime)?;
            let label = match task {
                Some(id) => match db.get_task_by_id(id).await? {
                    Some(t) => Some(t.title),
                    None => {
                        not_found("task", id);
                        return Ok(());
                    }
                },
                None => None,
            };
            let watch = Arc::new(RwLock::new(Stopwatch::default()));
            {
                let mut w = watch.write().await;
                match label {
                    Some(label) => w.start_for(label),
                    None => w.start(),
                };
            }
            let (ticker, mut ticks) = Ticker::spawn(Arc::clone(&watch));
            let finish = tokio::time::sleep(std::time::Duration::from_secs(seconds));
            tokio::pin!(finish);
            loop {
                tokio::select! {
                    _ = &mut finish => break,
                    Some(display) = ticks.recv() => println!("{display}"),
                }
            }
            ticker.cancel();
            let Some(completed) = watch.write().await.stop_with_note(note) else {
                bail!("stopwatch was not running");
            };
            println!("Stopped at {}", format_hms(completed.duration_seconds));
            if let Some(id) = task {
                let booked = views::time_tracking::book_session(db, id, &completed).await?;
                if let Lookup::Found(t) = booked {
                    println!("#{} now at {:.2}h tracked", t.id, t.tracked_hours);
                }
            }
        }
        Command::Reports { from, to, project, export } => {
            require(session, Permission::ViewReports)?;
            let range = match (from, to) {
                (Some(from), Some(to)) => Some(DateRange { from, to }),
                (None, None) => None,
                _ => bail!("--from and --to must be given together"),
            };
            let tasks = db.get_tasks().await?;
            let daily = views::reports::sample_daily_hours();
            let report = views::reports::build(&tasks, &daily, &ReportQuery { range, project });
            println!("By status:");
            for d in &report.status_distribution {
                println!("  {:<12} {}", d.name, d.value);
            }
            println!("By priority:");
            for d in &report.priority_distribution {
                println!("  {:<12} {}", d.name, d.value);
            }
            println!("Hours by assignee:");
            for d in &report.hours_by_assignee {
                println!("  {:<14} {:.1}", d.name, d.value);
            }
            println!("Logged {:.1}h over {} days", report.total_hours, report.daily_hours.len());
            if let Some(format) = export {
                println!("{}", views::reports::export(format));
            }
        }
        Command::Users { search, role } => {
            require(session, Permission::ManageUsers)?;
            let users = views::users::list(db, &UserQuery { text: search, role }).await?;
            let stats = views::users::stats(&db.get_users().await?);
            println!(
                "{} users, {} active ({} managers, {} employees, {} admins)",
                stats.total, stats.active, stats.managers, stats.employees, stats.admins
            );
            for u in users {
                println!("{:>3}  {:<14} {:<24} {:<8} {}", u.id, u.name, u.email, u.role, u.status);
            }
        }
        Command::Role { role } => {
            if session.user().is_none() {
                bail!("not signed in");
            }
            session.switch_role(role).await?;
            println!("Now acting as {role}");
        }
        Command::Login { role } => {
            let user = session.login(role).await?;
            println!("Signed in as {} ({})", user.name, user.role);
        }
        Command::Logout => {
            session.logout().await?;
            println!("Signed out");
        }
        Command::Nav => {
            let items = navigation::visible_items(&*session);
            if items.is_empty() {
                println!("Sign in to see the menu");
            }
            for item in items {
                println!("{:<14} {}", item.id, item.label);
            }
        }
    }
    Ok(())
}
