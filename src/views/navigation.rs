use crate::core::{
    permissions::Permission,
    session::{AuthSession, SessionStore},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub id: &'static str,
    pub label: &'static str,
    pub permission: Permission,
}

const fn item(id: &'static str, label: &'static str, permission: Permission) -> NavItem {
    NavItem {
        id,
        label,
        permission,
    }
}

pub const NAV_ITEMS: &[NavItem] = &[
    item("dashboard", "Dashboard", Permission::ViewTasks),
    item("projects", "Projects", Permission::ViewTasks),
    item("tasks", "My Tasks", Permission::ViewTasks),
    item("time-tracking", "Time Tracking", Permission::TrackTime),
    item("reports", "Reports", Permission::ViewReports),
    item("users", "User Management", Permission::ManageUsers),
    item("settings", "Settings", Permission::SystemConfig),
];

/// Sidebar entries the signed-in user may open, in display order.
pub fn visible_items<S: SessionStore>(session: &AuthSession<S>) -> Vec<NavItem> {
    NAV_ITEMS
        .iter()
        .filter(|item| session.has_permission(item.permission))
        .copied()
        .collect()
}

pub fn can_open<S: SessionStore>(session: &AuthSession<S>, id: &str) -> bool {
    NAV_ITEMS
        .iter()
        .any(|item| item.id == id && session.has_permission(item.permission))
}
