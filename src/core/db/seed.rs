//! Sample records the in-memory repository starts from.

use time::{
    Date, OffsetDateTime,
    macros::{date, datetime},
};

use crate::core::db::{
    model::{Priority, ProjectStatus, Role, TaskStatus, UserStatus},
    project::Project,
    task::{Comment, Subtask, Task},
    user::{Notification, User},
};

fn user(
    id: i64,
    name: &str,
    role: Role,
    status: UserStatus,
    join_date: Date,
    last_active: Date,
    tasks: (u32, u32),
) -> User {
    let email = format!("{}@company.com", name.to_lowercase().replace(' ', "."));
    User {
        id,
        name: name.to_string(),
        email,
        role,
        status,
        join_date,
        last_active,
        tasks_assigned: tasks.0,
        tasks_completed: tasks.1,
        _guard: (),
    }
}

#[rustfmt::skip]
pub(super) fn users() -> Vec<User> {
    vec![
        user(1, "John Doe", Role::Employee, UserStatus::Active, date!(2024 - 01 - 15), date!(2024 - 07 - 21), (12, 8)),
        user(2, "Jane Smith", Role::Manager, UserStatus::Active, date!(2023 - 08 - 20), date!(2024 - 07 - 21), (25, 22)),
        user(3, "Alice Johnson", Role::Employee, UserStatus::Active, date!(2024 - 03 - 10), date!(2024 - 07 - 20), (8, 6)),
        user(4, "Bob Wilson", Role::Employee, UserStatus::Inactive, date!(2023 - 11 - 05), date!(2024 - 07 - 15), (15, 12)),
        user(5, "Carol Brown", Role::Admin, UserStatus::Active, date!(2023 - 05 - 12), date!(2024 - 07 - 21), (5, 5)),
    ]
}

#[allow(clippy::too_many_arguments)]
fn project(
    id: i64,
    name: &str,
    description: &str,
    manager: &str,
    deadline: Date,
    status: ProjectStatus,
    priority: Priority,
    members: u32,
    tasks: (u32, u32),
) -> Project {
    Project {
        id,
        name: name.to_string(),
        description: description.to_string(),
        manager: manager.to_string(),
        deadline,
        status,
        priority,
        members,
        tasks_total: tasks.0,
        tasks_completed: tasks.1,
        _guard: (),
    }
}

pub(super) fn projects() -> Vec<Project> {
    vec![
        project(
            1,
            "Mobile App Redesign",
            "Complete redesign of the mobile application with new UI/UX",
            "Jane Smith",
            date!(2024 - 08 - 15),
            ProjectStatus::Active,
            Priority::High,
            5,
            (24, 18),
        ),
        project(
            2,
            "Database Migration",
            "Migrate legacy database to new cloud infrastructure",
            "John Doe",
            date!(2024 - 07 - 30),
            ProjectStatus::Active,
            Priority::Medium,
            3,
            (16, 7),
        ),
        project(
            3,
            "API Documentation",
            "Create comprehensive API documentation for developers",
            "Alice Johnson",
            date!(2024 - 09 - 01),
            ProjectStatus::Review,
            Priority::Low,
            2,
            (12, 11),
        ),
        project(
            4,
            "Security Audit",
            "Complete security audit and vulnerability assessment",
            "Bob Wilson",
            date!(2024 - 07 - 20),
            ProjectStatus::Completed,
            Priority::High,
            4,
            (20, 20),
        ),
    ]
}

struct SubtaskSeed {
    id: i64,
    title: &'static str,
    description: &'static str,
    status: TaskStatus,
    priority: Priority,
    assignee: &'static str,
    deadline: Date,
    estimated_hours: f64,
    tags: &'static [&'static str],
}

impl SubtaskSeed {
    fn build(self, parent_task_id: i64, updated_at: Date) -> Subtask {
        Subtask {
            id: self.id,
            parent_task_id,
            title: self.title.to_string(),
            description: self.description.to_string(),
            status: self.status,
            priority: self.priority,
            assignee: self.assignee.to_string(),
            deadline: self.deadline,
            estimated_hours: self.estimated_hours,
            tags: self.tags.iter().map(|t| t.to_string()).collect(),
            updated_at,
            _guard: (),
        }
    }
}

fn comment(
    id: i64,
    author: &str,
    content: &str,
    timestamp: OffsetDateTime,
    edited: bool,
) -> Comment {
    Comment {
        id,
        task_id: 1,
        author: author.to_string(),
        content: content.to_string(),
        timestamp,
        edited,
        _guard: (),
    }
}

/// Discussion thread on the interface redesign task.
fn redesign_comments() -> Vec<Comment> {
    vec![
        comment(
            1,
            "John Doe",
            "Started working on the wireframes. The new design looks promising!",
            datetime!(2024-07-20 10:30 UTC),
            false,
        ),
        comment(
            2,
            "Jane Smith",
            "Great progress! I've reviewed the initial mockups and they align well with our brand guidelines.",
            datetime!(2024-07-20 14:15 UTC),
            false,
        ),
        comment(
            3,
            "Alice Johnson",
            "Added some feedback in the Figma file. Please check the annotations on the header section.",
            datetime!(2024-07-21 09:45 UTC),
            true,
        ),
    ]
}

struct TaskSeed {
    id: i64,
    project_id: i64,
    title: &'static str,
    description: &'static str,
    status: TaskStatus,
    priority: Priority,
    assignee: &'static str,
    deadline: Date,
    hours: (f64, f64),
    tags: &'static [&'static str],
    dates: (Date, Date),
}

impl TaskSeed {
    fn build(self, subtasks: Vec<SubtaskSeed>, comments: Vec<Comment>) -> Task {
        let subtasks = subtasks
            .into_iter()
            .map(|sub| sub.build(self.id, self.dates.1))
            .collect();
        Task {
            id: self.id,
            project_id: self.project_id,
            title: self.title.to_string(),
            description: self.description.to_string(),
            status: self.status,
            priority: self.priority,
            assignee: self.assignee.to_string(),
            deadline: self.deadline,
            estimated_hours: self.hours.0,
            tracked_hours: self.hours.1,
            tags: self.tags.iter().map(|t| t.to_string()).collect(),
            subtasks,
            comments,
            created_at: self.dates.0,
            updated_at: self.dates.1,
            _guard: (),
        }
    }
}

pub(super) fn tasks() -> Vec<Task> {
    vec![
        TaskSeed {
            id: 1,
            project_id: 1,
            title: "Update user interface design",
            description: "Redesign the main dashboard with new color scheme and improved navigation",
            status: TaskStatus::InProgress,
            priority: Priority::High,
            assignee: "John Doe",
            deadline: date!(2024 - 07 - 25),
            hours: (16.0, 8.5),
            tags: &["UI/UX", "Frontend"],
            dates: (date!(2024 - 07 - 15), date!(2024 - 07 - 20)),
        }
        .build(
            vec![
                SubtaskSeed {
                    id: 101,
                    title: "Create wireframes",
                    description: "Low fidelity layouts for the dashboard screens",
                    status: TaskStatus::Completed,
                    priority: Priority::High,
                    assignee: "Jane Smith",
                    deadline: date!(2024 - 07 - 20),
                    estimated_hours: 6.0,
                    tags: &["UI/UX"],
                },
                SubtaskSeed {
                    id: 102,
                    title: "Design mockups",
                    description: "High fidelity mockups with the new color scheme",
                    status: TaskStatus::InProgress,
                    priority: Priority::High,
                    assignee: "Jane Smith",
                    deadline: date!(2024 - 07 - 25),
                    estimated_hours: 8.0,
                    tags: &["UI/UX", "Frontend"],
                },
            ],
            redesign_comments(),
        ),
        TaskSeed {
            id: 2,
            project_id: 2,
            title: "Database schema optimization",
            description: "Optimize database queries and improve indexing for better performance",
            status: TaskStatus::Todo,
            priority: Priority::Medium,
            assignee: "Jane Smith",
            deadline: date!(2024 - 07 - 30),
            hours: (12.0, 0.0),
            tags: &["Backend", "Database"],
            dates: (date!(2024 - 07 - 18), date!(2024 - 07 - 18)),
        }
        .build(
            vec![
                SubtaskSeed {
                    id: 201,
                    title: "Setup JWT authentication",
                    description: "Token issuing and validation middleware",
                    status: TaskStatus::Todo,
                    priority: Priority::Medium,
                    assignee: "John Doe",
                    deadline: date!(2024 - 07 - 28),
                    estimated_hours: 5.0,
                    tags: &["Backend", "Security"],
                },
                SubtaskSeed {
                    id: 202,
                    title: "Create user registration API",
                    description: "Sign-up endpoint with input checks",
                    status: TaskStatus::Todo,
                    priority: Priority::Medium,
                    assignee: "John Doe",
                    deadline: date!(2024 - 08 - 01),
                    estimated_hours: 4.0,
                    tags: &["Backend", "API"],
                },
            ],
            Vec::new(),
        ),
        TaskSeed {
            id: 3,
            project_id: 3,
            title: "API endpoint documentation",
            description: "Create comprehensive documentation for all REST API endpoints",
            status: TaskStatus::Review,
            priority: Priority::Low,
            assignee: "Alice Johnson",
            deadline: date!(2024 - 08 - 05),
            hours: (8.0, 7.5),
            tags: &["Documentation", "API"],
            dates: (date!(2024 - 07 - 10), date!(2024 - 07 - 19)),
        }
        .build(Vec::new(), Vec::new()),
        TaskSeed {
            id: 4,
            project_id: 4,
            title: "Security vulnerability assessment",
            description: "Conduct thorough security audit and fix identified vulnerabilities",
            status: TaskStatus::Completed,
            priority: Priority::High,
            assignee: "Bob Wilson",
            deadline: date!(2024 - 07 - 20),
            hours: (20.0, 18.0),
            tags: &["Security", "Testing"],
            dates: (date!(2024 - 07 - 05), date!(2024 - 07 - 20)),
        }
        .build(Vec::new(), Vec::new()),
        TaskSeed {
            id: 5,
            project_id: 1,
            title: "Mobile responsive testing",
            description: "Test application on various mobile devices and fix responsive issues",
            status: TaskStatus::Blocked,
            priority: Priority::Medium,
            assignee: "Carol Brown",
            deadline: date!(2024 - 07 - 28),
            hours: (10.0, 3.0),
            tags: &["Testing", "Mobile"],
            dates: (date!(2024 - 07 - 16), date!(2024 - 07 - 21)),
        }
        .build(Vec::new(), Vec::new()),
    ]
}

pub(super) fn notifications() -> Vec<Notification> {
    let entry = |id, title: &str, message: &str, age: &str, unread| Notification {
        id,
        title: title.to_string(),
        message: message.to_string(),
        age: age.to_string(),
        unread,
        _guard: (),
    };
    vec![
        entry(
            1,
            "Task assigned",
            "New task \"Update user interface\" has been assigned to you",
            "5 min ago",
            true,
        ),
        entry(
            2,
            "Task completed",
            "John Doe completed \"Database optimization\"",
            "1 hour ago",
            true,
        ),
        entry(
            3,
            "Project deadline",
            "Project \"Mobile App\" deadline is approaching",
            "2 hours ago",
            false,
        ),
    ]
}
