use std::future::Future;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::core::{
    db::{Role, StorageState},
    permissions::{self, Permission},
};

/// Storage key of the signed-in user record.
pub const SESSION_KEY: &str = "ems_user";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl SessionUser {
    /// The demo account that signs in for `role`.
    pub fn demo(role: Role) -> Self {
        let (id, name, email) = match role {
            Role::Employee => (1, "John Doe", "john.doe@company.com"),
            Role::Manager => (2, "Jane Smith", "jane.smith@company.com"),
            Role::Admin => (3, "Admin User", "admin@company.com"),
        };
        Self {
            id,
            name: name.to_string(),
            email: email.to_string(),
            role,
        }
    }
}

pub trait SessionStore {
    fn load(&self) -> impl Future<Output = anyhow::Result<Option<SessionUser>>>;
    fn save(&self, user: &SessionUser) -> impl Future<Output = anyhow::Result<()>>;
    fn clear(&self) -> impl Future<Output = anyhow::Result<()>>;
}

fn decode(raw: Option<String>) -> Option<SessionUser> {
    let raw = raw?;
    match serde_json::from_str(&raw) {
        Ok(user) => Some(user),
        Err(e) => {
            tracing::warn!(error = %e, "discarding unreadable session record");
            None
        }
    }
}

impl SessionStore for StorageState {
    async fn load(&self) -> anyhow::Result<Option<SessionUser>> {
        Ok(decode(self.get_item(SESSION_KEY).await?))
    }

    async fn save(&self, user: &SessionUser) -> anyhow::Result<()> {
        self.set_item(SESSION_KEY, &serde_json::to_string(user)?).await
    }

    async fn clear(&self) -> anyhow::Result<()> {
        self.remove_item(SESSION_KEY).await
    }
}

/// Session store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    raw: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn raw(&self) -> Option<String> {
        self.raw.lock().await.clone()
    }
}

impl SessionStore for MemorySessionStore {
    async fn load(&self) -> anyhow::Result<Option<SessionUser>> {
        Ok(decode(self.raw.lock().await.clone()))
    }

    async fn save(&self, user: &SessionUser) -> anyhow::Result<()> {
        *self.raw.lock().await = Some(serde_json::to_string(user)?);
        Ok(())
    }

    async fn clear(&self) -> anyhow::Result<()> {
        *self.raw.lock().await = None;
        Ok(())
    }
}

/// The signed-in user, kept in step with its store.
#[derive(Debug)]
pub struct AuthSession<S> {
    store: S,
    user: Option<SessionUser>,
}

impl<S: SessionStore> AuthSession<S> {
    /// Restore the stored user, or sign in the manager demo account and store it.
    pub async fn init(store: S) -> anyhow::Result<Self> {
        let user = match store.load().await? {
            Some(user) => user,
            None => {
                let user = SessionUser::demo(Role::Manager);
                store.save(&user).await?;
                user
            }
        };
        tracing::debug!(user = %user.email, role = %user.role, "session restored");
        Ok(Self {
            store,
            user: Some(user),
        })
    }

    pub async fn login(&mut self, role: Role) -> anyhow::Result<&SessionUser> {
        let user = SessionUser::demo(role);
        self.store.save(&user).await?;
        tracing::info!(user = %user.email, %role, "signed in");
        Ok(&*self.user.insert(user))
    }

    pub async fn switch_role(&mut self, role: Role) -> anyhow::Result<()> {
        let user = SessionUser::demo(role);
        self.store.save(&user).await?;
        tracing::info!(%role, "role switched");
        self.user = Some(user);
        Ok(())
    }

    pub async fn logout(&mut self) -> anyhow::Result<()> {
        self.store.clear().await?;
        tracing::info!("signed out");
        self.user = None;
        Ok(())
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.role()
            .is_some_and(|role| permissions::role_has(role, permission))
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
