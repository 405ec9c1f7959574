//! Checks run on the create forms before anything reaches a repository.

use time::Date;

use crate::{
    core::db::{NewProject, NewSubtask, NewTask, Priority},
    error::ValidationErrors,
};

#[derive(Debug, Clone, Default)]
pub struct ProjectForm {
    pub name: String,
    pub description: String,
    pub manager: String,
    pub deadline: Option<Date>,
    pub priority: Option<Priority>,
    pub members: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TaskForm {
    pub project_id: i64,
    pub title: String,
    pub description: String,
    pub assignee: String,
    pub deadline: Option<Date>,
    pub priority: Option<Priority>,
    /// Raw text from the hours input; blank means no estimate.
    pub estimated_hours: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SubtaskForm {
    pub title: String,
    pub description: String,
    pub assignee: String,
    pub deadline: Option<Date>,
    pub priority: Option<Priority>,
    pub estimated_hours: String,
    pub tags: Vec<String>,
}

fn check_deadline(
    errors: &mut ValidationErrors,
    deadline: Option<Date>,
    today: Date,
    missing: &str,
) -> Option<Date> {
    match deadline {
        None => {
            errors.add("deadline", missing);
            None
        }
        // A deadline of today has already begun.
        Some(d) if d <= today => {
            errors.add("deadline", "Deadline cannot be in the past");
            None
        }
        Some(d) => Some(d),
    }
}

/// Blank means no estimate; anything else must parse to a positive number.
fn check_hours(errors: &mut ValidationErrors, raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<f64>() {
        Ok(hours) if hours.is_finite() && hours > 0.0 => Some(hours),
        _ => {
            errors.add("estimatedHours", "Estimated hours must be a positive number");
            None
        }
    }
}

fn require(errors: &mut ValidationErrors, field: &'static str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.add(field, message);
    }
}

impl ProjectForm {
    pub fn validate(&self, today: Date) -> Result<NewProject, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        require(&mut errors, "name", &self.name, "Project name is required");
        require(
            &mut errors,
            "description",
            &self.description,
            "Project description is required",
        );
        let deadline =
            check_deadline(&mut errors, self.deadline, today, "Project deadline is required");
        if self.priority.is_none() {
            errors.add("priority", "Priority is required");
        }
        if self.members.is_empty() {
            errors.add("members", "At least one team member is required");
        }

        match (deadline, self.priority) {
            (Some(deadline), Some(priority)) if errors.is_empty() => Ok(NewProject {
                name: self.name.trim().to_string(),
                description: self.description.trim().to_string(),
                manager: self.manager.clone(),
                deadline,
                priority,
                members: self.members.clone(),
            }),
            _ => Err(errors),
        }
    }
}

impl TaskForm {
    pub fn validate(&self, today: Date) -> Result<NewTask, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        require(&mut errors, "title", &self.title, "Task title is required");
        require(
            &mut errors,
            "description",
            &self.description,
            "Task description is required",
        );
        require(&mut errors, "assignee", &self.assignee, "Assignee is required");
        let deadline = check_deadline(&mut errors, self.deadline, today, "Deadline is required");
        if self.priority.is_none() {
            errors.add("priority", "Priority is required");
        }

        let estimated_hours = check_hours(&mut errors, &self.estimated_hours);

        match (deadline, self.priority) {
            (Some(deadline), Some(priority)) if errors.is_empty() => Ok(NewTask {
                project_id: self.project_id,
                title: self.title.trim().to_string(),
                description: self.description.trim().to_string(),
                priority,
                assignee: self.assignee.clone(),
                deadline,
                estimated_hours,
                tags: self.tags.clone(),
            }),
            _ => Err(errors),
        }
    }
}

impl SubtaskForm {
    pub fn validate(&self, today: Date) -> Result<NewSubtask, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        require(&mut errors, "title", &self.title, "Subtask title is required");
        require(
            &mut errors,
            "description",
            &self.description,
            "Subtask description is required",
        );
        require(&mut errors, "assignee", &self.assignee, "Assignee is required");
        let deadline = check_deadline(&mut errors, self.deadline, today, "Deadline is required");
        if self.priority.is_none() {
            errors.add("priority", "Priority is required");
        }
        let estimated_hours = check_hours(&mut errors, &self.estimated_hours);

        match (deadline, self.priority) {
            (Some(deadline), Some(priority)) if errors.is_empty() => Ok(NewSubtask {
                title: self.title.trim().to_string(),
                description: self.description.trim().to_string(),
                priority,
                assignee: self.assignee.clone(),
                deadline,
                estimated_hours,
                tags: self.tags.clone(),
            }),
            _ => Err(errors),
        }
    }
}
