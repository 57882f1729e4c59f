//! Stored entities

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A guestbook entry kept in the JSON message file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub timestamp: String,
}

impl Message {
    /// Creates a message stamped with the current UTC time, e.g. `2025-01-31T12:00:00.000Z`.
    pub fn now(text: impl Into<String>) -> Self {
        Message {
            text: text.into(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// The public part of a `users` row. Passwords never leave the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
}
