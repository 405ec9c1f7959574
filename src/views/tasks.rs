use time::OffsetDateTime;

use crate::{
    core::{
        db::{
            Comment, NewComment, NewSubtask, Priority, Subtask, SubtaskUpdate, Task,
            TaskRepository, TaskStatus,
        },
        permissions::Permission,
        session::{AuthSession, SessionStore},
    },
    error::TaskboardError,
    filter::{Category, TaskSort, days_until, matches_text, sort_tasks, task_progress},
    views::Lookup,
};

#[derive(Debug, Clone, Default)]
pub struct TaskQuery {
    pub text: String,
    pub status: Category<TaskStatus>,
    pub priority: Category<Priority>,
    pub sort: TaskSort,
}

impl TaskQuery {
    pub fn matches(&self, task: &Task) -> bool {
        matches_text(task, &self.text)
            && self.status.matches(&task.status)
            && self.priority.matches(&task.priority)
    }
}

#[derive(Debug, Clone)]
pub struct TaskRow {
    pub task: Task,
    pub days_left: i64,
    pub progress: f64,
}

pub fn rows(tasks: &[Task], query: &TaskQuery, now: OffsetDateTime) -> Vec<TaskRow> {
    let mut matching: Vec<&Task> = tasks.iter().filter(|t| query.matches(t)).collect();
    sort_tasks(&mut matching, query.sort);
    matching
        .into_iter()
        .map(|task| TaskRow {
            days_left: days_until(task.deadline, now),
            progress: task_progress(task.tracked_hours, task.estimated_hours),
            task: task.clone(),
        })
        .collect()
}

pub async fn list<R: TaskRepository>(
    repo: &R,
    query: &TaskQuery,
    now: OffsetDateTime,
) -> anyhow::Result<Vec<TaskRow>> {
    let tasks = repo.get_tasks().await?;
    Ok(rows(&tasks, query, now))
}

pub async fn detail<R: TaskRepository>(repo: &R, id: i64) -> anyhow::Result<Lookup<Task>> {
    Ok(Lookup::from_option(repo.get_task_by_id(id).await?, "task", id))
}

pub async fn add_subtask<R: TaskRepository>(
    repo: &R,
    parent_id: i64,
    subtask: &NewSubtask,
) -> anyhow::Result<Lookup<Subtask>> {
    let Some(parent) = repo.get_task_by_id(parent_id).await? else {
        return Ok(Lookup::NotFound {
            kind: "task",
            id: parent_id,
        });
    };
    Ok(Lookup::Found(repo.add_subtask(&parent, subtask).await?))
}

/// Apply an edit to one subtask of `parent_id`.
pub async fn edit_subtask<R: TaskRepository>(
    repo: &R,
    parent_id: i64,
    subtask_id: i64,
    update: &SubtaskUpdate<'_>,
) -> anyhow::Result<Lookup<Subtask>> {
    let subtask = repo
        .get_task_by_id(parent_id)
        .await?
        .and_then(|t| t.subtasks.into_iter().find(|s| s.id == subtask_id));
    let Some(subtask) = subtask else {
        return Ok(Lookup::NotFound {
            kind: "subtask",
            id: subtask_id,
        });
    };
    Ok(Lookup::Found(repo.update_subtask(&subtask, update).await?))
}

/// Post a comment as the signed-in user. Blank content is rejected by the
/// repository.
pub async fn add_comment<R, S>(
    repo: &R,
    session: &AuthSession<S>,
    task_id: i64,
    content: &str,
) -> anyhow::Result<Lookup<Comment>>
where
    R: TaskRepository,
    S: SessionStore,
{
    let author = match session.user() {
        Some(user) if session.has_permission(Permission::AddComments) => user.name.clone(),
        _ => return Err(TaskboardError::PermissionDenied(Permission::AddComments).into()),
    };
    let Some(task) = repo.get_task_by_id(task_id).await? else {
        return Ok(Lookup::NotFound {
            kind: "task",
            id: task_id,
        });
    };
    let comment = NewComment {
        author,
        content: content.to_string(),
    };
    Ok(Lookup::Found(repo.add_comment(&task, &comment).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{db::MemoryDb, session::MemorySessionStore};
    use time::macros::{date, datetime};

    const NOW: OffsetDateTime = datetime!(2024-07-21 09:00 UTC);

    #[tokio::test]
    async fn tags_are_searched() -> anyhow::Result<()> {
        let db = MemoryDb::seeded();
        let query = TaskQuery {
            text: "frontend".into(),
            ..Default::default()
        };
        let rows = list(&db, &query, NOW).await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].task.id, 1);
        assert_eq!(rows[0].progress, 53.125);
        Ok(())
    }

    #[tokio::test]
    async fn priority_sort_puts_high_first() -> anyhow::Result<()> {
        let db = MemoryDb::seeded();
        let query = TaskQuery {
            sort: TaskSort::Priority,
            ..Default::default()
        };
        let ids: Vec<i64> = list(&db, &query, NOW).await?.iter().map(|r| r.task.id).collect();
        assert_eq!(ids, [1, 4, 2, 5, 3]);

        let query = TaskQuery {
            priority: Category::Only(Priority::Medium),
            status: Category::Only(TaskStatus::Blocked),
            ..Default::default()
        };
        let rows = list(&db, &query, NOW).await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].task.title, "Mobile responsive testing");
        Ok(())
    }

    #[tokio::test]
    async fn deadline_sort_is_default() -> anyhow::Result<()> {
        let db = MemoryDb::seeded();
        let ids: Vec<i64> = list(&db, &TaskQuery::default(), NOW)
            .await?
            .iter()
            .map(|r| r.task.id)
            .collect();
        assert_eq!(ids, [4, 1, 5, 2, 3]);
        Ok(())
    }

    #[tokio::test]
    async fn title_sort_ignores_case() -> anyhow::Result<()> {
        let db = MemoryDb::seeded();
        let new = crate::core::db::NewTask {
            project_id: 1,
            title: "alpha release".into(),
            description: "Cut the first build".into(),
            priority: Priority::Low,
            assignee: "bob Wilson".into(),
            deadline: date!(2024 - 09 - 01),
            estimated_hours: None,
            tags: vec![],
        };
        db.add_task(&new).await?;

        let query = TaskQuery {
            sort: TaskSort::Title,
            ..Default::default()
        };
        let rows = list(&db, &query, NOW).await?;
        assert_eq!(rows[0].task.title, "alpha release");
        assert_eq!(rows[1].task.title, "API endpoint documentation");

        let query = TaskQuery {
            sort: TaskSort::Assignee,
            ..Default::default()
        };
        let assignees: Vec<String> = list(&db, &query, NOW)
            .await?
            .into_iter()
            .map(|r| r.task.assignee)
            .collect();
        assert_eq!(
            assignees,
            ["Alice Johnson", "Bob Wilson", "bob Wilson", "Carol Brown", "Jane Smith", "John Doe"]
        );
        Ok(())
    }

    #[tokio::test]
    async fn subtask_for_missing_parent() -> anyhow::Result<()> {
        let db = MemoryDb::seeded();
        let new = NewSubtask {
            title: "Review copy".into(),
            description: "Check the endpoint wording".into(),
            priority: Priority::Low,
            assignee: "John Doe".into(),
            deadline: date!(2024 - 07 - 30),
            estimated_hours: None,
            tags: vec!["Documentation".into()],
        };
        assert!(!add_subtask(&db, 99, &new).await?.is_found());

        let created = add_subtask(&db, 3, &new).await?.found().expect("task 3 exists");
        assert_eq!(created.id, 203);
        assert_eq!(created.parent_task_id, 3);
        assert_eq!(created.status, TaskStatus::Todo);
        Ok(())
    }

    #[tokio::test]
    async fn subtask_edits_apply_in_place() -> anyhow::Result<()> {
        let db = MemoryDb::seeded();
        let tags = vec!["Backend".to_string()];
        let update = SubtaskUpdate {
            status: Some(TaskStatus::InProgress),
            estimated_hours: Some(7.0),
            tags: Some(&tags),
            ..Default::default()
        };
        let edited = edit_subtask(&db, 2, 201, &update).await?.found().expect("subtask 201");
        assert_eq!(edited.status, TaskStatus::InProgress);
        assert_eq!(edited.estimated_hours, 7.0);
        assert_eq!(edited.tags, ["Backend"]);
        assert_eq!(edited.title, "Setup JWT authentication");

        let parent = db.get_task_by_id(2).await?.expect("task 2");
        assert_eq!(parent.subtasks[0].status, TaskStatus::InProgress);

        // 201 belongs to task 2, not task 1.
        assert!(!edit_subtask(&db, 1, 201, &update).await?.is_found());
        Ok(())
    }

    #[tokio::test]
    async fn comments_need_permission_and_content() -> anyhow::Result<()> {
        let db = MemoryDb::seeded();
        let mut session = AuthSession::init(MemorySessionStore::new()).await?;
        session.login(crate::core::db::Role::Employee).await?;

        let seeded = db.get_task_by_id(1).await?.expect("task 1").comments;
        assert_eq!(seeded.len(), 3);
        assert!(seeded[2].edited);

        let posted = add_comment(&db, &session, 1, "  Wireframes signed off ")
            .await?
            .found()
            .expect("task 1");
        assert_eq!(posted.id, 4);
        assert_eq!(posted.author, "John Doe");
        assert_eq!(posted.content, "Wireframes signed off");
        assert!(!posted.edited);

        let blank = add_comment(&db, &session, 1, "   ").await.unwrap_err();
        assert!(matches!(
            blank.downcast_ref::<TaskboardError>(),
            Some(TaskboardError::EmptyComment)
        ));
        assert!(!add_comment(&db, &session, 9, "hello").await?.is_found());
        assert_eq!(db.get_task_by_id(1).await?.expect("task 1").comments.len(), 4);

        session.logout().await?;
        let denied = add_comment(&db, &session, 1, "hello").await.unwrap_err();
        assert!(matches!(
            denied.downcast_ref::<TaskboardError>(),
            Some(TaskboardError::PermissionDenied(Permission::AddComments))
        ));
        Ok(())
    }
}
