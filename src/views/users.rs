use crate::{
    core::db::{Role, User, UserRepository, UserStatus},
    filter::{Category, count_where, matches_text},
    views::Lookup,
};

#[derive(Debug, Clone, Default)]
pub struct UserQuery {
    pub text: String,
    pub role: Category<Role>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserStats {
    pub total: usize,
    pub active: usize,
    pub managers: usize,
    pub employees: usize,
    pub admins: usize,
}

pub fn stats(users: &[User]) -> UserStats {
    UserStats {
        total: users.len(),
        active: count_where(users, |u| u.status == UserStatus::Active),
        managers: count_where(users, |u| u.role == Role::Manager),
        employees: count_where(users, |u| u.role == Role::Employee),
        admins: count_where(users, |u| u.role == Role::Admin),
    }
}

pub async fn list<R: UserRepository>(repo: &R, query: &UserQuery) -> anyhow::Result<Vec<User>> {
    Ok(repo
        .get_users()
        .await?
        .into_iter()
        .filter(|u| matches_text(u, &query.text) && query.role.matches(&u.role))
        .collect())
}

pub async fn change_role<R: UserRepository>(
    repo: &R,
    id: i64,
    role: Role,
) -> anyhow::Result<Lookup<User>> {
    match repo.get_user_by_id(id).await? {
        Some(user) => Ok(Lookup::Found(repo.set_user_role(&user, role).await?)),
        None => Ok(Lookup::NotFound { kind: "user", id }),
    }
}

/// Flip a user between active and inactive.
pub async fn toggle_status<R: UserRepository>(repo: &R, id: i64) -> anyhow::Result<Lookup<User>> {
    match repo.get_user_by_id(id).await? {
        Some(user) => {
            let status = user.status.toggled();
            Ok(Lookup::Found(repo.set_user_status(&user, status).await?))
        }
        None => Ok(Lookup::NotFound { kind: "user", id }),
    }
}

pub async fn delete<R: UserRepository>(repo: &R, id: i64) -> anyhow::Result<Lookup<()>> {
    match repo.get_user_by_id(id).await? {
        Some(user) => {
            repo.delete_user(user).await?;
            Ok(Lookup::Found(()))
        }
        None => Ok(Lookup::NotFound { kind: "user", id }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::db::MemoryDb;

    #[tokio::test]
    async fn search_by_email_and_role() -> anyhow::Result<()> {
        let db = MemoryDb::seeded();
        let query = UserQuery {
            text: "COMPANY.COM".into(),
            role: Category::Only(Role::Employee),
        };
        let names: Vec<String> = list(&db, &query).await?.into_iter().map(|u| u.name).collect();
        assert_eq!(names, ["John Doe", "Alice Johnson", "Bob Wilson"]);
        Ok(())
    }

    #[tokio::test]
    async fn stats_follow_mutations() -> anyhow::Result<()> {
        let db = MemoryDb::seeded();
        let before = stats(&db.get_users().await?);
        assert_eq!(
            before,
            UserStats {
                total: 5,
                active: 4,
                managers: 1,
                employees: 3,
                admins: 1
            }
        );

        let bob = toggle_status(&db, 4).await?.found().expect("bob");
        assert_eq!(bob.status, UserStatus::Active);
        change_role(&db, 1, Role::Manager).await?;
        assert!(delete(&db, 5).await?.is_found());
        assert!(!delete(&db, 5).await?.is_found());

        let after = stats(&db.get_users().await?);
        assert_eq!(after.total, 4);
        assert_eq!(after.active, 4);
        assert_eq!(after.managers, 2);
        assert_eq!(after.admins, 0);
        Ok(())
    }
}
