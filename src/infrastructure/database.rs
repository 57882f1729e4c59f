//! Pooled SQLite connection backing the user store
//!
//! The handle moves between two states: closed and open. `initialize` opens it (creating the
//! file, the `users` table and the seed rows as needed) and `close` releases it again. Anything
//! that needs the pool while the handle is closed gets [`StoreError::NotInitialized`].
//!
//! An open handle holds two pools over the same file. Lookups go through the reader pool, whose
//! connections run with `PRAGMA query_only = ON`, so statements stacked onto an injected lookup
//! cannot change the table.

use crate::infrastructure::StoreError;
use log::{debug, error, info};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{SqliteConnection, SqlitePool};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Rows inserted into an empty `users` table, in insertion order.
pub const SEED_USERS: [(&str, &str); 3] = [
    ("admin", "adminpass"),
    ("user1", "pass123"),
    ("user2", "securepass"),
];

struct Pools {
    writer: SqlitePool,
    reader: SqlitePool,
}

pub struct DatabaseConnection {
    path: PathBuf,
    pools: Mutex<Option<Pools>>,
}

impl DatabaseConnection {
    /// Creates a closed handle for the database file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> DatabaseConnection {
        DatabaseConnection {
            path: path.into(),
            pools: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens the store if needed and returns the pool.
    ///
    /// Calling this on an open handle returns the existing pool without touching the schema or
    /// the seed rows.
    pub async fn initialize(&self) -> Result<SqlitePool, StoreError> {
        let mut slot = self.pools.lock().await;
        if let Some(pools) = slot.as_ref() {
            debug!("user store already open at {}", self.path.display());
            return Ok(pools.writer.clone());
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                error!("failed to create data directory {}: {e}", parent.display());
                e
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(&self.path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| {
                error!("failed to open user store at {}: {e}", self.path.display());
                e
            })?;

        setup_schema(&pool).await?;

        let reader_options = SqliteConnectOptions::new()
            .filename(&self.path)
            .pragma("query_only", "ON");

        let reader = match SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(reader_options)
            .await
        {
            Ok(reader) => reader,
            Err(e) => {
                error!("failed to open read-only pool at {}: {e}", self.path.display());
                pool.close().await;
                return Err(e.into());
            }
        };
        info!("user store opened at {}", self.path.display());

        *slot = Some(Pools {
            writer: pool.clone(),
            reader,
        });
        Ok(pool)
    }

    /// Returns the writable pool of an open handle.
    pub async fn pool(&self) -> Result<SqlitePool, StoreError> {
        self.pools
            .lock()
            .await
            .as_ref()
            .map(|pools| pools.writer.clone())
            .ok_or(StoreError::NotInitialized)
    }

    /// Returns the pool used for lookups. Its connections reject every write.
    pub async fn read_only_pool(&self) -> Result<SqlitePool, StoreError> {
        self.pools
            .lock()
            .await
            .as_ref()
            .map(|pools| pools.reader.clone())
            .ok_or(StoreError::NotInitialized)
    }

    pub async fn is_open(&self) -> bool {
        self.pools.lock().await.is_some()
    }

    /// Releases both pools. Does nothing if the handle is already closed.
    pub async fn close(&self) {
        let pools = self.pools.lock().await.take();
        if let Some(pools) = pools {
            pools.reader.close().await;
            pools.writer.close().await;
            info!("user store closed");
        }
    }
}

async fn setup_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            password TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    if count.0 == 0 {
        let mut tx = pool.begin().await?;
        insert_seed_users(&mut tx).await?;
        tx.commit().await?;
        info!("seeded users table with {} rows", SEED_USERS.len());
    }

    Ok(())
}

/// Inserts the fixed seed rows. Does not check what is already there.
pub(crate) async fn insert_seed_users(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    for (name, password) in SEED_USERS {
        sqlx::query("INSERT INTO users (name, password) VALUES (?, ?)")
            .bind(name)
            .bind(password)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}
