use std::{
    ops::{Deref, DerefMut},
    path::{Path, PathBuf},
};

use anyhow::Context;
use sqlx::{
    Row, Sqlite,
    pool::PoolConnection,
    sqlite::{
        SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
    },
};
use tokio::sync::{RwLock, RwLockReadGuard};

/// Small key/value store kept in a sqlite file. Holds the records that
/// outlive a single run, such as the signed-in user.
pub struct StorageState {
    state_file: PathBuf,
    pool: RwLock<SqlitePool>,
}

impl std::fmt::Debug for StorageState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageState")
            .field("state_file", &self.state_file)
            .finish()
    }
}

impl StorageState {
    pub async fn new<P: AsRef<Path>>(state_file: P) -> anyhow::Result<Self> {
        let state_file = state_file.as_ref().to_path_buf();

        if !state_file.parent().map(|p| p.as_os_str().is_empty() || p.is_dir()).unwrap_or(true) {
            anyhow::bail!("State file parent does not exist: {:?}", state_file);
        }

        let connect_opts = SqliteConnectOptions::new()
            .filename(&state_file)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(2)
            .connect_with(connect_opts)
            .await
            .with_context(|| format!("Failed to open state file {:?}", state_file))?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::debug!(path = ?state_file, "state store opened");
        Ok(Self {
            state_file,
            pool: RwLock::new(pool),
        })
    }

    /// Acquire a pooled connection and hold the pool read lock for the entire lifetime
    /// of the returned guard.
    async fn conn(&self) -> anyhow::Result<DbConnGuard<'_>> {
        let pool_guard = self.pool.read().await;
        let conn = pool_guard.acquire().await?;

        Ok(DbConnGuard {
            _pool_guard: pool_guard,
            conn,
        })
    }

    pub async fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        let mut conn = self.conn().await?;
        let row = sqlx::query("SELECT value FROM local_storage WHERE key = $1")
            .bind(key)
            .fetch_optional(&mut **conn)
            .await?;
        Ok(row.map(|r| r.get::<String, _>("value")))
    }

    pub async fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut conn = self.conn().await?;
        sqlx::query(
            r#"INSERT INTO local_storage (key, value) VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value"#,
        )
        .bind(key)
        .bind(value)
        .execute(&mut **conn)
        .await?;
        Ok(())
    }

    pub async fn remove_item(&self, key: &str) -> anyhow::Result<()> {
        let mut conn = self.conn().await?;
        sqlx::query("DELETE FROM local_storage WHERE key = $1")
            .bind(key)
            .execute(&mut **conn)
            .await?;
        Ok(())
    }

    /// Flush the WAL and release the file handles.
    pub async fn close(&self) -> anyhow::Result<()> {
        let pool_guard = self.pool.write().await;
        sqlx::query("PRAGMA wal_checkpoint(TRUNCATE);")
            .execute(&*pool_guard)
            .await?;
        pool_guard.close().await;
        Ok(())
    }
}

struct DbConnGuard<'a> {
    _pool_guard: RwLockReadGuard<'a, SqlitePool>,
    conn: PoolConnection<Sqlite>,
}

impl<'a> Deref for DbConnGuard<'a> {
    type Target = PoolConnection<Sqlite>;
    fn deref(&self) -> &Self::Target {
        &self.conn
    }
}

impl<'a> DerefMut for DbConnGuard<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.conn
    }
}
