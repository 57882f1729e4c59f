//! Storage back ends: the JSON message file and the SQLite user table

use thiserror::Error;

pub mod database;
pub mod entities;
pub mod repositories;
pub mod traits;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("user store is not initialized")]
    NotInitialized,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
