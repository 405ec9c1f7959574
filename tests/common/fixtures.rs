use taskboard::core::db::{MemoryDb, NewProject, NewTask, Priority, StorageState};
use time::{Date, OffsetDateTime, macros::date, macros::datetime};

/// Date the seeded records are read against.
pub const TODAY: Date = date!(2024 - 07 - 21);
pub const NOW: OffsetDateTime = datetime!(2024-07-21 09:00 UTC);

/// Seeded repository with a pinned "today".
pub fn seeded_db() -> MemoryDb {
    MemoryDb::seeded().with_today(TODAY)
}

/// Opens a session store in a fresh temp directory.
/// Returns both the store and the directory (which must be kept alive).
pub async fn create_test_state() -> (StorageState, tempfile::TempDir) {
    let dir = tempfile::TempDir::new().expect("Failed to create temp directory");
    let state = StorageState::new(dir.path().join("taskboard.db"))
        .await
        .expect("Failed to open state file");
    (state, dir)
}

pub fn make_new_project(name: &str) -> NewProject {
    NewProject {
        name: name.to_string(),
        description: format!("{name} description"),
        manager: "Jane Smith".to_string(),
        deadline: date!(2024 - 09 - 30),
        priority: Priority::Medium,
        members: vec!["John Doe".to_string(), "Alice Johnson".to_string()],
    }
}

pub fn make_new_task(project_id: i64, title: &str) -> NewTask {
    NewTask {
        project_id,
        title: title.to_string(),
        description: format!("{title} description"),
        priority: Priority::High,
        assignee: "John Doe".to_string(),
        deadline: date!(2024 - 08 - 10),
        estimated_hours: Some(6.0),
        tags: vec!["Backend".to_string()],
    }
}
