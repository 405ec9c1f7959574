use time::OffsetDateTime;

use crate::{
    core::db::{
        Notification, NotificationRepository, Project, ProjectRepository, ProjectStatus, Task,
        TaskRepository, TaskStatus,
    },
    filter::{count_where, days_until, percentage},
    views::reports::ChartDatum,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub in_progress_tasks: usize,
    pub blocked_tasks: usize,
    pub overdue_tasks: usize,
    pub completion_rate: u32,
    pub active_projects: usize,
    pub unread_notifications: usize,
    /// Tasks assigned to the viewer, when one is signed in.
    pub my_open_tasks: Option<usize>,
}

pub fn is_overdue(task: &Task, now: OffsetDateTime) -> bool {
    task.status != TaskStatus::Completed && days_until(task.deadline, now) < 0
}

pub fn summarize(
    tasks: &[Task],
    projects: &[Project],
    notifications: &[Notification],
    viewer: Option<&str>,
    now: OffsetDateTime,
) -> DashboardStats {
    let completed = count_where(tasks, |t| t.status == TaskStatus::Completed);
    DashboardStats {
        total_tasks: tasks.len(),
        completed_tasks: completed,
        in_progress_tasks: count_where(tasks, |t| t.status == TaskStatus::InProgress),
        blocked_tasks: count_where(tasks, |t| t.status == TaskStatus::Blocked),
        overdue_tasks: count_where(tasks, |t| is_overdue(t, now)),
        completion_rate: percentage(completed, tasks.len()),
        active_projects: count_where(projects, |p| p.status == ProjectStatus::Active),
        unread_notifications: count_where(notifications, |n| n.unread),
        my_open_tasks: viewer.map(|name| {
            count_where(tasks, |t| t.assignee == name && t.status != TaskStatus::Completed)
        }),
    }
}

/// Tasks per project, for the project bar chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectTaskCount {
    pub name: String,
    pub tasks: usize,
    pub completed: usize,
}

pub fn project_task_counts(projects: &[Project], tasks: &[Task]) -> Vec<ProjectTaskCount> {
    projects
        .iter()
        .map(|project| ProjectTaskCount {
            name: project.name.clone(),
            tasks: count_where(tasks, |t| t.project_id == project.id),
            completed: count_where(tasks, |t| {
                t.project_id == project.id && t.status == TaskStatus::Completed
            }),
        })
        .collect()
}

const STATUS_SERIES: [(TaskStatus, &str); 4] = [
    (TaskStatus::Todo, "To Do"),
    (TaskStatus::InProgress, "In Progress"),
    (TaskStatus::Review, "Review"),
    (TaskStatus::Completed, "Completed"),
];

/// Status pie slices. Every slice is present, even when empty.
pub fn status_series(tasks: &[Task]) -> Vec<ChartDatum> {
    STATUS_SERIES
        .iter()
        .map(|&(status, name)| ChartDatum {
            name: name.to_string(),
            value: count_where(tasks, |t| t.status == status) as f64,
        })
        .collect()
}

pub async fn load<R>(
    repo: &R,
    viewer: Option<&str>,
    now: OffsetDateTime,
) -> anyhow::Result<DashboardStats>
where
    R: TaskRepository + ProjectRepository + NotificationRepository,
{
    let tasks = repo.get_tasks().await?;
    let projects = repo.get_projects().await?;
    let notifications = repo.get_notifications().await?;
    Ok(summarize(&tasks, &projects, &notifications, viewer, now))
}
