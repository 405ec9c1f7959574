use serde::Serialize;
use thiserror::Error;

use crate::core::db::Priority;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub email: bool,
    pub task_assignments: bool,
    pub deadline_reminders: bool,
    pub status_updates: bool,
    pub weekly_reports: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            email: true,
            task_assignments: true,
            deadline_reminders: true,
            status_updates: false,
            weekly_reports: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkingHours {
    pub start: String,
    pub end: String,
}

/// Intervals are in minutes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeTrackingSettings {
    pub screenshot_interval: u32,
    pub idle_timeout: u32,
    pub auto_breaks: bool,
    pub working_hours: WorkingHours,
}

impl Default for TimeTrackingSettings {
    fn default() -> Self {
        Self {
            screenshot_interval: 5,
            idle_timeout: 15,
            auto_breaks: true,
            working_hours: WorkingHours {
                start: "09:00".into(),
                end: "17:00".into(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSettings {
    pub default_task_priority: Priority,
    pub auto_assign_tasks: bool,
    pub require_time_estimates: bool,
    pub allow_subtasks: bool,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            default_task_priority: Priority::Medium,
            auto_assign_tasks: false,
            require_time_estimates: true,
            allow_subtasks: true,
        }
    }
}

pub const DEFAULT_TAGS: [&str; 10] = [
    "Frontend",
    "Backend",
    "UI/UX",
    "Database",
    "API",
    "Testing",
    "Documentation",
    "Security",
    "Mobile",
    "Performance",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TagError {
    #[error("tag name is empty")]
    Empty,
    #[error("tag `{0}` already exists")]
    Duplicate(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub notifications: NotificationSettings,
    pub time_tracking: TimeTrackingSettings,
    pub system: SystemSettings,
    pub custom_tags: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            notifications: NotificationSettings::default(),
            time_tracking: TimeTrackingSettings::default(),
            system: SystemSettings::default(),
            custom_tags: DEFAULT_TAGS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl Settings {
    /// Adds a trimmed tag. Exact duplicates are rejected.
    pub fn add_tag(&mut self, name: &str) -> Result<&str, TagError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TagError::Empty);
        }
        if self.custom_tags.iter().any(|t| t == name) {
            return Err(TagError::Duplicate(name.to_string()));
        }
        tracing::debug!(tag = name, "tag added");
        self.custom_tags.push(name.to_string());
        let last = self.custom_tags.len() - 1;
        Ok(&self.custom_tags[last])
    }

    /// Returns whether the tag was present.
    pub fn remove_tag(&mut self, name: &str) -> bool {
        let before = self.custom_tags.len();
        self.custom_tags.retain(|t| t != name);
        before != self.custom_tags.len()
    }

    pub fn save(&self) -> String {
        tracing::info!("settings saved");
        "Settings saved".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_serialize_in_camel_case() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(json["notifications"]["statusUpdates"], false);
        assert_eq!(json["timeTracking"]["idleTimeout"], 15);
        assert_eq!(json["timeTracking"]["workingHours"]["end"], "17:00");
        assert_eq!(json["system"]["defaultTaskPriority"], "medium");
        assert_eq!(json["customTags"].as_array().unwrap().len(), 10);
    }

    #[test]
    fn tags_are_trimmed_and_unique() {
        let mut settings = Settings::default();
        assert_eq!(settings.add_tag("  DevOps "), Ok("DevOps"));
        assert_eq!(
            settings.add_tag("API"),
            Err(TagError::Duplicate("API".into()))
        );
        assert_eq!(settings.add_tag("   "), Err(TagError::Empty));
        assert!(settings.remove_tag("Frontend"));
        assert!(!settings.remove_tag("Frontend"));
        assert_eq!(settings.custom_tags.len(), 10);
        assert_eq!(settings.custom_tags.last().map(String::as_str), Some("DevOps"));
        assert_eq!(settings.save(), "Settings saved");
    }
}
