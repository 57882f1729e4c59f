//! Service "interfaces" used by the route handlers

use crate::infrastructure::StoreError;
use crate::infrastructure::entities;
use async_trait::async_trait;

#[async_trait]
pub trait MessageBoardService: Send + Sync {
    /// Lists all messages, oldest first.
    async fn list_messages(&self) -> Vec<entities::Message>;

    /// Stores `text` as a new message stamped with the current time.
    ///
    /// Blank text is ignored and `None` is returned.
    async fn post_message(&self, text: &str) -> Option<entities::Message>;
}

#[async_trait]
pub trait MaintenanceService: Send + Sync {
    /// Empties the message file and restores the seed users.
    async fn reset_data(&self) -> Result<(), StoreError>;
}
