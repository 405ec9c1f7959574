use time::OffsetDateTime;

use crate::{
    core::db::{
        Project, ProjectRepository, ProjectStatus, Subtask, Task, TaskRepository, TaskStatus,
    },
    filter::{Category, days_until, matches_text, percentage},
    views::Lookup,
};

#[derive(Debug, Clone, Default)]
pub struct ProjectQuery {
    pub text: String,
    pub status: Category<ProjectStatus>,
}

#[derive(Debug, Clone)]
pub struct ProjectRow {
    pub project: Project,
    pub days_left: i64,
    pub progress: u32,
}

impl ProjectRow {
    fn new(project: Project, now: OffsetDateTime) -> Self {
        let days_left = days_until(project.deadline, now);
        let progress = percentage(
            project.tasks_completed as usize,
            project.tasks_total as usize,
        );
        Self {
            project,
            days_left,
            progress,
        }
    }
}

pub async fn list<R: ProjectRepository>(
    repo: &R,
    query: &ProjectQuery,
    now: OffsetDateTime,
) -> anyhow::Result<Vec<ProjectRow>> {
    Ok(repo
        .get_projects()
        .await?
        .into_iter()
        .filter(|p| matches_text(p, &query.text) && query.status.matches(&p.status))
        .map(|p| ProjectRow::new(p, now))
        .collect())
}

#[derive(Debug, Clone, Default)]
pub struct DetailQuery {
    pub text: String,
    pub status: Category<TaskStatus>,
}

#[derive(Debug, Clone)]
pub struct ProjectDetail {
    pub row: ProjectRow,
    pub tasks: Vec<Task>,
    pub subtasks: Vec<Subtask>,
    pub total_tasks: usize,
    pub total_subtasks: usize,
}

/// One project with its tasks and the subtasks of those tasks, both
/// narrowed by `query`. Totals count before filtering.
pub async fn detail<R>(
    repo: &R,
    id: i64,
    query: &DetailQuery,
    now: OffsetDateTime,
) -> anyhow::Result<Lookup<ProjectDetail>>
where
    R: ProjectRepository + TaskRepository,
{
    let Some(project) = repo.get_project_by_id(id).await? else {
        return Ok(Lookup::NotFound { kind: "project", id });
    };
    let tasks = repo.get_tasks_by_project(id).await?;
    let subtasks: Vec<Subtask> = tasks.iter().flat_map(|t| t.subtasks.clone()).collect();
    let total_tasks = tasks.len();
    let total_subtasks = subtasks.len();

    let needle = query.text.to_lowercase();
    let tasks = tasks
        .into_iter()
        .filter(|t| {
            let text = t.title.to_lowercase().contains(&needle)
                || t.description.to_lowercase().contains(&needle);
            text && query.status.matches(&t.status)
        })
        .collect();
    let subtasks = subtasks
        .into_iter()
        .filter(|s| s.title.to_lowercase().contains(&needle) && query.status.matches(&s.status))
        .collect();

    Ok(Lookup::Found(ProjectDetail {
        row: ProjectRow::new(project, now),
        tasks,
        subtasks,
        total_tasks,
        total_subtasks,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::db::MemoryDb;
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2024-07-21 09:00 UTC);

    #[tokio::test]
    async fn search_and_status_combine() -> anyhow::Result<()> {
        let db = MemoryDb::seeded();
        let query = ProjectQuery {
            text: "MIGRATE".into(),
            status: Category::All,
        };
        let rows = list(&db, &query, NOW).await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].project.name, "Database Migration");
        assert_eq!(rows[0].days_left, 9);
        assert_eq!(rows[0].progress, 44);

        let query = ProjectQuery {
            text: String::new(),
            status: Category::Only(ProjectStatus::Completed),
        };
        let rows = list(&db, &query, NOW).await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].days_left, -1);
        Ok(())
    }

    #[tokio::test]
    async fn detail_flattens_subtasks() -> anyhow::Result<()> {
        let db = MemoryDb::seeded();
        let full = detail(&db, 1, &DetailQuery::default(), NOW)
            .await?
            .found()
            .expect("project 1 exists");
        assert_eq!(full.total_tasks, 2);
        assert_eq!(full.total_subtasks, 2);
        assert!(full.subtasks.iter().all(|s| s.parent_task_id == 1));

        let query = DetailQuery {
            text: String::new(),
            status: Category::Only(TaskStatus::Completed),
        };
        let filtered = detail(&db, 1, &query, NOW).await?.found().unwrap();
        assert!(filtered.tasks.is_empty());
        assert_eq!(filtered.subtasks.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn detail_search_skips_tags() -> anyhow::Result<()> {
        let db = MemoryDb::seeded();
        let by_tag = DetailQuery {
            text: "frontend".into(),
            status: Category::All,
        };
        let found = detail(&db, 1, &by_tag, NOW).await?.found().expect("project 1");
        assert!(found.tasks.is_empty());

        let by_description = DetailQuery {
            text: "COLOR SCHEME".into(),
            status: Category::All,
        };
        let found = detail(&db, 1, &by_description, NOW).await?.found().expect("project 1");
        assert_eq!(found.tasks.len(), 1);
        assert_eq!(found.tasks[0].id, 1);
        Ok(())
    }

    #[tokio::test]
    async fn missing_project_is_not_found() -> anyhow::Result<()> {
        let db = MemoryDb::seeded();
        let result = detail(&db, 42, &DetailQuery::default(), NOW).await?;
        assert!(matches!(result, Lookup::NotFound { kind: "project", id: 42 }));
        Ok(())
    }
}
