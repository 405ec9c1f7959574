mod fixtures;
pub use fixtures::*;

pub use taskboard::core::db::{
    MemoryDb, NewProject, NewTask, Priority, ProjectRepository, ProjectStatus, ProjectUpdate, Role,
    StorageState, Task, TaskRepository, TaskStatus, TaskUpdate, UserRepository, UserStatus,
};
