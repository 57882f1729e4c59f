//! Repository implementations over the JSON file and the SQLite pool

use crate::infrastructure::StoreError;
use crate::infrastructure::database::{DatabaseConnection, insert_seed_users};
use crate::infrastructure::entities::{Message, UserRow};
use crate::infrastructure::traits::{MessageRepository, UserRepository};
use async_trait::async_trait;
use log::{error, info};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Messages stored as one pretty-printed JSON array.
///
/// Every write rewrites the whole file. Writers inside this process are serialized by
/// `write_lock`; another process writing the same file can still lose updates.
pub struct JsonMessageRepository {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonMessageRepository {
    pub fn new(path: impl Into<PathBuf>) -> JsonMessageRepository {
        JsonMessageRepository {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Vec<Message> {
        let data = match tokio::fs::read_to_string(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                error!("error reading messages file {}: {e}", self.path.display());
                return Vec::new();
            }
        };

        serde_json::from_str(&data).unwrap_or_else(|e| {
            error!("error parsing messages file {}: {e}", self.path.display());
            Vec::new()
        })
    }

    async fn store(&self, messages: &[Message]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let data = serde_json::to_string_pretty(messages)?;
        tokio::fs::write(&self.path, data).await?;
        Ok(())
    }
}

#[async_trait]
impl MessageRepository for JsonMessageRepository {
    async fn read_all(&self) -> Vec<Message> {
        self.load().await
    }

    async fn append(&self, message: Message) {
        let _guard = self.write_lock.lock().await;
        let mut messages = self.load().await;
        messages.push(message);
        if let Err(e) = self.store(&messages).await {
            error!("error writing messages file {}: {e}", self.path.display());
        }
    }

    async fn write_all(&self, messages: &[Message]) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        self.store(messages).await.map_err(|e| {
            error!("error writing messages file {}: {e}", self.path.display());
            e
        })
    }
}

/// Builds the SQL text used by the injectable lookup. No escaping happens here.
pub fn unsafe_lookup_query(name: &str) -> String {
    format!("SELECT id, name FROM users WHERE name = '{name}'")
}

pub struct DbUserRepository {
    connection: Arc<DatabaseConnection>,
}

impl DbUserRepository {
    pub fn new(connection: Arc<DatabaseConnection>) -> DbUserRepository {
        DbUserRepository { connection }
    }
}

#[async_trait]
impl UserRepository for DbUserRepository {
    async fn find_by_name_unsafe(&self, name: &str) -> Result<Vec<UserRow>, StoreError> {
        let pool = self.connection.read_only_pool().await?;
        let query = unsafe_lookup_query(name);
        info!("executing unsafe query: {query}");

        let users = sqlx::query_as::<_, UserRow>(&query)
            .fetch_all(&pool)
            .await
            .map_err(|e| {
                error!("unsafe lookup failed: {e}");
                e
            })?;
        Ok(users)
    }

    async fn find_by_name_safe(&self, name: &str) -> Result<Option<UserRow>, StoreError> {
        let pool = self.connection.read_only_pool().await?;

        let user = sqlx::query_as::<_, UserRow>("SELECT id, name FROM users WHERE name = ?")
            .bind(name)
            .fetch_optional(&pool)
            .await
            .map_err(|e| {
                error!("safe lookup failed: {e}");
                e
            })?;
        Ok(user)
    }

    async fn reseed(&self) -> Result<(), StoreError> {
        let pool = self.connection.pool().await?;

        let mut tx = pool.begin().await?;
        sqlx::query("DELETE FROM users").execute(&mut *tx).await?;
        insert_seed_users(&mut tx).await?;
        tx.commit().await?;

        info!("users table reseeded");
        Ok(())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let pool = self.connection.pool().await?;
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await?;
        Ok(count.0)
    }
}
