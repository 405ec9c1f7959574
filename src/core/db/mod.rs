mod model;
mod project;
mod seed;
mod state;
mod task;
mod user;

use std::sync::Arc;

use time::{Date, OffsetDateTime};
use tokio::sync::RwLock;

use crate::error::TaskboardError;

pub use model::{ParseError, Priority, ProjectStatus, Role, TaskStatus, UserStatus};
pub use project::{NewProject, Project, ProjectRepository, ProjectUpdate};
pub use state::StorageState;
pub use task::{
    Comment, NewComment, NewSubtask, NewTask, Subtask, SubtaskUpdate, Task, TaskRepository,
    TaskUpdate,
};
pub use user::{NewUser, Notification, NotificationRepository, User, UserRepository};

#[derive(Debug, Default)]
struct Collections {
    projects: Vec<Project>,
    tasks: Vec<Task>,
    users: Vec<User>,
    notifications: Vec<Notification>,
}

/// In-memory repository. Clones share the same collections.
#[derive(Debug, Clone)]
pub struct MemoryDb {
    state: Arc<RwLock<Collections>>,
    today: Date,
}

fn next_id(ids: impl Iterator<Item = i64>) -> i64 {
    ids.max().unwrap_or(0) + 1
}

fn utc_today() -> Date {
    OffsetDateTime::now_utc().date()
}

impl MemoryDb {
    /// Repository filled with the sample users, projects, tasks and notifications.
    pub fn seeded() -> Self {
        Self::from_collections(Collections {
            projects: seed::projects(),
            tasks: seed::tasks(),
            users: seed::users(),
            notifications: seed::notifications(),
        })
    }

    pub fn empty() -> Self {
        Self::from_collections(Collections::default())
    }

    fn from_collections(collections: Collections) -> Self {
        Self {
            state: Arc::new(RwLock::new(collections)),
            today: utc_today(),
        }
    }

    /// Pin the date stamped on created and updated records.
    pub fn with_today(mut self, today: Date) -> Self {
        self.today = today;
        self
    }
}

impl ProjectRepository for MemoryDb {
    async fn get_projects(&self) -> anyhow::Result<Vec<Project>> {
        Ok(self.state.read().await.projects.clone())
    }

    async fn get_project_by_id(&self, id: i64) -> anyhow::Result<Option<Project>> {
        let state = self.state.read().await;
        Ok(state.projects.iter().find(|p| p.id == id).cloned())
    }

    async fn add_project(&self, project: &NewProject) -> anyhow::Result<Project> {
        let mut state = self.state.write().await;
        let record = Project {
            id: next_id(state.projects.iter().map(|p| p.id)),
            name: project.name.clone(),
            description: project.description.clone(),
            manager: project.manager.clone(),
            deadline: project.deadline,
            status: ProjectStatus::Active,
            priority: project.priority,
            members: project.members.len() as u32,
            tasks_total: 0,
            tasks_completed: 0,
            _guard: (),
        };
        state.projects.push(record.clone());
        tracing::info!(id = record.id, name = %record.name, "project created");
        Ok(record)
    }

    async fn update_project(
        &self,
        project: &Project,
        update: &ProjectUpdate,
    ) -> anyhow::Result<Project> {
        let mut state = self.state.write().await;
        let record = state
            .projects
            .iter_mut()
            .find(|p| p.id == project.id)
            .ok_or(TaskboardError::NotFound {
                kind: "project",
                id: project.id,
            })?;
        if let Some(name) = &update.name {
            record.name = name.clone();
        }
        if let Some(description) = &update.description {
            record.description = description.clone();
        }
        if let Some(manager) = &update.manager {
            record.manager = manager.clone();
        }
        if let Some(deadline) = update.deadline {
            record.deadline = deadline;
        }
        if let Some(status) = update.status {
            record.status = status;
        }
        if let Some(priority) = update.priority {
            record.priority = priority;
        }
        if let Some(members) = update.members {
            record.members = members;
        }
        tracing::info!(id = record.id, "project updated");
        Ok(record.clone())
    }

    async fn delete_project(&self, project: Project) -> anyhow::Result<()> {
        let mut state = self.state.write().await;
        state.projects.retain(|p| p.id != project.id);
        tracing::info!(id = project.id, "project deleted");
        Ok(())
    }
}

impl TaskRepository for MemoryDb {
    async fn get_tasks(&self) -> anyhow::Result<Vec<Task>> {
        Ok(self.state.read().await.tasks.clone())
    }

    async fn get_task_by_id(&self, id: i64) -> anyhow::Result<Option<Task>> {
        let state = self.state.read().await;
        Ok(state.tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn get_tasks_by_project(&self, project_id: i64) -> anyhow::Result<Vec<Task>> {
        let state = self.state.read().await;
        Ok(state
            .tasks
            .iter()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn add_task(&self, task: &NewTask) -> anyhow::Result<Task> {
        let mut state = self.state.write().await;
        let record = Task {
            id: next_id(state.tasks.iter().map(|t| t.id)),
            project_id: task.project_id,
            title: task.title.clone(),
            description: task.description.clone(),
            status: TaskStatus::Todo,
            priority: task.priority,
            assignee: task.assignee.clone(),
            deadline: task.deadline,
            estimated_hours: task.estimated_hours.unwrap_or(0.0),
            tracked_hours: 0.0,
            tags: task.tags.clone(),
            subtasks: Vec::new(),
            comments: Vec::new(),
            created_at: self.today,
            updated_at: self.today,
            _guard: (),
        };
        state.tasks.push(record.clone());
        tracing::info!(id = record.id, project_id = record.project_id, "task created");
        Ok(record)
    }

    async fn update_task(&self, task: &Task, update: &TaskUpdate<'_>) -> anyhow::Result<Task> {
        let mut state = self.state.write().await;
        let record = state
            .tasks
            .iter_mut()
            .find(|t| t.id == task.id)
            .ok_or(TaskboardError::NotFound {
                kind: "task",
                id: task.id,
            })?;
        if let Some(title) = update.title {
            record.title = title.to_string();
        }
        if let Some(description) = update.description {
            record.description = description.to_string();
        }
        if let Some(status) = update.status {
            record.status = status;
        }
        if let Some(priority) = update.priority {
            record.priority = priority;
        }
        if let Some(assignee) = update.assignee {
            record.assignee = assignee.to_string();
        }
        if let Some(deadline) = update.deadline {
            record.deadline = deadline;
        }
        if let Some(tracked_hours) = update.tracked_hours {
            record.tracked_hours = tracked_hours;
        }
        record.updated_at = self.today;
        tracing::info!(id = record.id, status = %record.status, "task updated");
        Ok(record.clone())
    }

    async fn delete_task(&self, task: Task) -> anyhow::Result<()> {
        let mut state = self.state.write().await;
        state.tasks.retain(|t| t.id != task.id);
        tracing::info!(id = task.id, "task deleted");
        Ok(())
    }

    async fn add_subtask(&self, parent: &Task, subtask: &NewSubtask) -> anyhow::Result<Subtask> {
        let mut state = self.state.write().await;
        let id = next_id(
            state
                .tasks
                .iter()
                .flat_map(|t| t.subtasks.iter().map(|s| s.id)),
        );
        let record = state
            .tasks
            .iter_mut()
            .find(|t| t.id == parent.id)
            .ok_or(TaskboardError::NotFound {
                kind: "task",
                id: parent.id,
            })?;
        let created = Subtask {
            id,
            parent_task_id: record.id,
            title: subtask.title.clone(),
            description: subtask.description.clone(),
            status: TaskStatus::Todo,
            priority: subtask.priority,
            assignee: subtask.assignee.clone(),
            deadline: subtask.deadline,
            estimated_hours: subtask.estimated_hours.unwrap_or(0.0),
            tags: subtask.tags.clone(),
            updated_at: self.today,
            _guard: (),
        };
        record.subtasks.push(created.clone());
        record.updated_at = self.today;
        tracing::info!(id = created.id, parent = record.id, "subtask created");
        Ok(created)
    }

    async fn update_subtask(
        &self,
        subtask: &Subtask,
        update: &SubtaskUpdate<'_>,
    ) -> anyhow::Result<Subtask> {
        let mut state = self.state.write().await;
        let record = state
            .tasks
            .iter_mut()
            .find(|t| t.id == subtask.parent_task_id)
            .and_then(|t| t.subtasks.iter_mut().find(|s| s.id == subtask.id))
            .ok_or(TaskboardError::NotFound {
                kind: "subtask",
                id: subtask.id,
            })?;
        if let Some(title) = update.title {
            record.title = title.to_string();
        }
        if let Some(description) = update.description {
            record.description = description.to_string();
        }
        if let Some(status) = update.status {
            record.status = status;
        }
        if let Some(priority) = update.priority {
            record.priority = priority;
        }
        if let Some(assignee) = update.assignee {
            record.assignee = assignee.to_string();
        }
        if let Some(deadline) = update.deadline {
            record.deadline = deadline;
        }
        if let Some(hours) = update.estimated_hours {
            record.estimated_hours = hours;
        }
        if let Some(tags) = update.tags {
            record.tags = tags.to_vec();
        }
        record.updated_at = self.today;
        tracing::info!(id = record.id, parent = record.parent_task_id, "subtask updated");
        Ok(record.clone())
    }

    async fn add_comment(&self, task: &Task, comment: &NewComment) -> anyhow::Result<Comment> {
        let content = comment.content.trim();
        if content.is_empty() {
            return Err(TaskboardError::EmptyComment.into());
        }
        let mut state = self.state.write().await;
        let id = next_id(
            state
                .tasks
                .iter()
                .flat_map(|t| t.comments.iter().map(|c| c.id)),
        );
        let record = state
            .tasks
            .iter_mut()
            .find(|t| t.id == task.id)
            .ok_or(TaskboardError::NotFound {
                kind: "task",
                id: task.id,
            })?;
        let created = Comment {
            id,
            task_id: record.id,
            author: comment.author.clone(),
            content: content.to_string(),
            timestamp: OffsetDateTime::now_utc(),
            edited: false,
            _guard: (),
        };
        record.comments.push(created.clone());
        tracing::info!(id = created.id, task = record.id, "comment added");
        Ok(created)
    }
}

impl UserRepository for MemoryDb {
    async fn get_users(&self) -> anyhow::Result<Vec<User>> {
        Ok(self.state.read().await.users.clone())
    }

    async fn get_user_by_id(&self, id: i64) -> anyhow::Result<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn add_user(&self, user: &NewUser) -> anyhow::Result<User> {
        let mut state = self.state.write().await;
        let record = User {
            id: next_id(state.users.iter().map(|u| u.id)),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            status: UserStatus::Active,
            join_date: user.join_date,
            last_active: user.join_date,
            tasks_assigned: 0,
            tasks_completed: 0,
            _guard: (),
        };
        state.users.push(record.clone());
        tracing::info!(id = record.id, role = %record.role, "user created");
        Ok(record)
    }

    async fn set_user_role(&self, user: &User, role: Role) -> anyhow::Result<User> {
        let mut state = self.state.write().await;
        let record = state
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(TaskboardError::NotFound {
                kind: "user",
                id: user.id,
            })?;
        record.role = role;
        tracing::info!(id = record.id, %role, "user role changed");
        Ok(record.clone())
    }

    async fn set_user_status(&self, user: &User, status: UserStatus) -> anyhow::Result<User> {
        let mut state = self.state.write().await;
        let record = state
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(TaskboardError::NotFound {
                kind: "user",
                id: user.id,
            })?;
        record.status = status;
        tracing::info!(id = record.id, %status, "user status changed");
        Ok(record.clone())
    }

    async fn delete_user(&self, user: User) -> anyhow::Result<()> {
        let mut state = self.state.write().await;
        state.users.retain(|u| u.id != user.id);
        tracing::info!(id = user.id, "user deleted");
        Ok(())
    }
}

impl NotificationRepository for MemoryDb {
    async fn get_notifications(&self) -> anyhow::Result<Vec<Notification>> {
        Ok(self.state.read().await.notifications.clone())
    }

    async fn mark_all_read(&self) -> anyhow::Result<()> {
        let mut state = self.state.write().await;
        for notification in state.notifications.iter_mut() {
            notification.unread = false;
        }
        Ok(())
    }
}
