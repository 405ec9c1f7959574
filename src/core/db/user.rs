use std::future::Future;

use time::Date;

use crate::core::db::model::{Role, UserStatus};

#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: UserStatus,
    pub join_date: Date,
    pub last_active: Date,
    pub tasks_assigned: u32,
    pub tasks_completed: u32,
    pub(super) _guard: (),
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub join_date: Date,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: i64,
    pub title: String,
    pub message: String,
    pub age: String,
    pub unread: bool,
    pub(super) _guard: (),
}

pub trait UserRepository {
    fn get_users(&self) -> impl Future<Output = anyhow::Result<Vec<User>>>;
    fn get_user_by_id(&self, id: i64) -> impl Future<Output = anyhow::Result<Option<User>>>;
    fn add_user(&self, user: &NewUser) -> impl Future<Output = anyhow::Result<User>>;
    fn set_user_role(&self, user: &User, role: Role) -> impl Future<Output = anyhow::Result<User>>;
    fn set_user_status(
        &self,
        user: &User,
        status: UserStatus,
    ) -> impl Future<Output = anyhow::Result<User>>;
    fn delete_user(&self, user: User) -> impl Future<Output = anyhow::Result<()>>;
}

pub trait NotificationRepository {
    fn get_notifications(&self) -> impl Future<Output = anyhow::Result<Vec<Notification>>>;
    fn mark_all_read(&self) -> impl Future<Output = anyhow::Result<()>>;
}
