use crate::{
    core::db::{Task, TaskRepository, TaskStatus, TaskUpdate},
    views::Lookup,
};

pub const COLUMNS: &[(TaskStatus, &str)] = &[
    (TaskStatus::Todo, "OPEN"),
    (TaskStatus::Pending, "PENDING"),
    (TaskStatus::InProgress, "IN PROGRESS"),
    (TaskStatus::Review, "REVIEW"),
    (TaskStatus::Completed, "COMPLETED"),
];

#[derive(Debug, Clone)]
pub struct Column {
    pub status: TaskStatus,
    pub title: &'static str,
    pub tasks: Vec<Task>,
}

/// Tasks grouped into the board columns. Statuses without a column
/// (blocked) are left off the board.
pub fn board(tasks: &[Task]) -> Vec<Column> {
    COLUMNS
        .iter()
        .map(|&(status, title)| Column {
            status,
            title,
            tasks: tasks.iter().filter(|t| t.status == status).cloned().collect(),
        })
        .collect()
}

/// Initials shown on a card, e.g. "Jane Smith" -> "JS".
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|part| part.chars().next())
        .collect()
}

#[derive(Debug, Clone)]
pub enum Move {
    Moved { from: TaskStatus, task: Task },
    Unchanged(Task),
}

/// Drop a card onto another column.
pub async fn move_task<R: TaskRepository>(
    repo: &R,
    task_id: i64,
    to: TaskStatus,
) -> anyhow::Result<Lookup<Move>> {
    let Some(task) = repo.get_task_by_id(task_id).await? else {
        return Ok(Lookup::NotFound {
            kind: "task",
            id: task_id,
        });
    };
    if task.status == to {
        return Ok(Lookup::Found(Move::Unchanged(task)));
    }
    let from = task.status;
    let update = TaskUpdate {
        status: Some(to),
        ..Default::default()
    };
    let task = repo.update_task(&task, &update).await?;
    tracing::info!(task = task_id, %from, %to, "card moved");
    Ok(Lookup::Found(Move::Moved { from, task }))
}
