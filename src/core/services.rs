//! Implementations for the services the handlers need.
//!

use crate::core::traits::{MaintenanceService, MessageBoardService};
use crate::infrastructure::StoreError;
use crate::infrastructure::entities::Message;
use crate::infrastructure::traits::{MessageRepository, UserRepository};
use async_trait::async_trait;
use log::{info, warn};
use std::sync::Arc;

pub struct FileMessageBoardService {
    repo: Arc<dyn MessageRepository>,
}

impl FileMessageBoardService {
    pub fn new(repo: Arc<dyn MessageRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl MessageBoardService for FileMessageBoardService {
    async fn list_messages(&self) -> Vec<Message> {
        self.repo.read_all().await
    }

    async fn post_message(&self, text: &str) -> Option<Message> {
        if text.is_empty() {
            return None;
        }

        let message = Message::now(text);
        self.repo.append(message.clone()).await;
        info!("stored message posted at {}", message.timestamp);
        Some(message)
    }
}

pub struct StoreMaintenanceService {
    messages: Arc<dyn MessageRepository>,
    users: Arc<dyn UserRepository>,
}

impl StoreMaintenanceService {
    pub fn new(messages: Arc<dyn MessageRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { messages, users }
    }
}

#[async_trait]
impl MaintenanceService for StoreMaintenanceService {
    async fn reset_data(&self) -> Result<(), StoreError> {
        warn!("resetting message and user stores");
        self.messages.clear().await?;
        self.users.reseed().await
    }
}
