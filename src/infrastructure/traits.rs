//! Infrastructure traits, used as seams by the higher layers

use crate::infrastructure::StoreError;
use crate::infrastructure::entities;
use async_trait::async_trait;

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Returns every stored message in insertion order.
    ///
    /// Never fails: a missing or unreadable backing file yields an empty list.
    async fn read_all(&self) -> Vec<entities::Message>;

    /// Appends a message. Write failures are logged, not returned.
    async fn append(&self, message: entities::Message);

    /// Replaces the stored sequence with `messages`.
    async fn write_all(&self, messages: &[entities::Message]) -> Result<(), StoreError>;

    /// Empties the store.
    async fn clear(&self) -> Result<(), StoreError> {
        self.write_all(&[]).await
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Looks users up by splicing `name` straight into the SQL text.
    ///
    /// This is the injection demo. Quotes in `name` change the meaning of the query.
    async fn find_by_name_unsafe(&self, name: &str) -> Result<Vec<entities::UserRow>, StoreError>;

    /// Looks a user up with `name` bound as a parameter. Returns the first match.
    async fn find_by_name_safe(&self, name: &str) -> Result<Option<entities::UserRow>, StoreError>;

    /// Deletes every row and inserts the seed users again.
    async fn reseed(&self) -> Result<(), StoreError>;

    async fn count(&self) -> Result<i64, StoreError>;
}
