use std::collections::BTreeSet;

use crate::core::db::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Permission {
    ViewTasks,
    EditOwnTasks,
    TrackTime,
    AddComments,
    CreateProjects,
    AssignTasks,
    ApproveTasks,
    ViewReports,
    ManageUsers,
    SystemConfig,
}

const EMPLOYEE: &[Permission] = &[
    Permission::ViewTasks,
    Permission::EditOwnTasks,
    Permission::TrackTime,
    Permission::AddComments,
];

const MANAGER: &[Permission] = &[
    Permission::CreateProjects,
    Permission::AssignTasks,
    Permission::ApproveTasks,
    Permission::ViewReports,
];

const ADMIN: &[Permission] = &[Permission::ManageUsers, Permission::SystemConfig];

/// Every permission granted to `role`. Each role includes the grants of the
/// roles below it.
pub fn permissions_for(role: Role) -> BTreeSet<Permission> {
    let tiers: &[&[Permission]] = match role {
        Role::Employee => &[EMPLOYEE],
        Role::Manager => &[EMPLOYEE, MANAGER],
        Role::Admin => &[EMPLOYEE, MANAGER, ADMIN],
    };
    tiers.iter().flat_map(|tier| tier.iter().copied()).collect()
}

pub fn role_has(role: Role, permission: Permission) -> bool {
    permissions_for(role).contains(&permission)
}
