use std::future::Future;

use time::{Date, OffsetDateTime};

use crate::core::db::model::{Priority, TaskStatus};

#[derive(Debug, Clone)]
pub struct Subtask {
    pub id: i64,
    pub parent_task_id: i64,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: Priority,
    pub assignee: String,
    pub deadline: Date,
    pub estimated_hours: f64,
    pub tags: Vec<String>,
    pub updated_at: Date,
    pub(super) _guard: (),
}

/// A note left on a task's discussion thread.
#[derive(Debug, Clone)]
pub struct Comment {
    pub id: i64,
    pub task_id: i64,
    pub author: String,
    pub content: String,
    pub timestamp: OffsetDateTime,
    pub edited: bool,
    pub(super) _guard: (),
}

#[derive(Debug, Clone)]
pub struct Task {
    pub id: i64,
    pub project_id: i64,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: Priority,
    pub assignee: String,
    pub deadline: Date,
    pub estimated_hours: f64,
    pub tracked_hours: f64,
    pub tags: Vec<String>,
    pub subtasks: Vec<Subtask>,
    pub comments: Vec<Comment>,
    pub created_at: Date,
    pub updated_at: Date,
    pub(super) _guard: (),
}

#[derive(Debug, Clone)]
pub struct NewTask {
    pub project_id: i64,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub assignee: String,
    pub deadline: Date,
    pub estimated_hours: Option<f64>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct NewSubtask {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub assignee: String,
    pub deadline: Date,
    pub estimated_hours: Option<f64>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SubtaskUpdate<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub assignee: Option<&'a str>,
    pub deadline: Option<Date>,
    pub estimated_hours: Option<f64>,
    pub tags: Option<&'a [String]>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub author: String,
    pub content: String,
}

#[derive(Debug, Clone, Default)]
pub struct TaskUpdate<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub assignee: Option<&'a str>,
    pub deadline: Option<Date>,
    pub tracked_hours: Option<f64>,
}

pub trait TaskRepository {
    fn get_tasks(&self) -> impl Future<Output = anyhow::Result<Vec<Task>>>;
    fn get_task_by_id(&self, id: i64) -> impl Future<Output = anyhow::Result<Option<Task>>>;
    fn get_tasks_by_project(
        &self,
        project_id: i64,
    ) -> impl Future<Output = anyhow::Result<Vec<Task>>>;
    fn add_task(&self, task: &NewTask) -> impl Future<Output = anyhow::Result<Task>>;
    fn update_task(
        &self,
        task: &Task,
        update: &TaskUpdate<'_>,
    ) -> impl Future<Output = anyhow::Result<Task>>;
    fn delete_task(&self, task: Task) -> impl Future<Output = anyhow::Result<()>>;
    fn add_subtask(
        &self,
        parent: &Task,
        subtask: &NewSubtask,
    ) -> impl Future<Output = anyhow::Result<Subtask>>;
    fn update_subtask(
        &self,
        subtask: &Subtask,
        update: &SubtaskUpdate<'_>,
    ) -> impl Future<Output = anyhow::Result<Subtask>>;
    /// Fails when the content is blank after trimming.
    fn add_comment(
        &self,
        task: &Task,
        comment: &NewComment,
    ) -> impl Future<Output = anyhow::Result<Comment>>;
}
