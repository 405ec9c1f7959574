use std::future::Future;

use time::Date;

use crate::core::db::model::{Priority, ProjectStatus};

#[derive(Debug, Clone)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub manager: String,
    pub deadline: Date,
    pub status: ProjectStatus,
    pub priority: Priority,
    pub members: u32,
    pub tasks_total: u32,
    pub tasks_completed: u32,
    pub(super) _guard: (),
}

#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub manager: String,
    pub deadline: Date,
    pub priority: Priority,
    pub members: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub manager: Option<String>,
    pub deadline: Option<Date>,
    pub status: Option<ProjectStatus>,
    pub priority: Option<Priority>,
    pub members: Option<u32>,
}

pub trait ProjectRepository {
    fn get_projects(&self) -> impl Future<Output = anyhow::Result<Vec<Project>>>;
    fn get_project_by_id(&self, id: i64) -> impl Future<Output = anyhow::Result<Option<Project>>>;
    fn add_project(&self, project: &NewProject) -> impl Future<Output = anyhow::Result<Project>>;
    fn update_project(
        &self,
        project: &Project,
        update: &ProjectUpdate,
    ) -> impl Future<Output = anyhow::Result<Project>>;
    fn delete_project(&self, project: Project) -> impl Future<Output = anyhow::Result<()>>;
}
