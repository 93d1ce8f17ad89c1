//! Domain DTOs for the chat API.
//!
//! # Design
//! These mirror the mock-server's schema but are defined independently so
//! the core never depends on Axum. Integration tests catch schema drift.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::edited;

/// Server-assigned identifier. Treated as an opaque string; the client never
/// assumes a format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Id {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<Uuid> for Id {
    fn from(value: Uuid) -> Self {
        Self(value.to_string())
    }
}

/// A conversation container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Thread {
    pub id: Id,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Thread {
    /// True once the title has been changed at least a second after creation.
    pub fn is_edited(&self) -> bool {
        edited::is_edited(self.created_at, self.updated_at)
    }

    /// "Last edited" label relative to `now`, or `None` if never edited.
    pub fn last_edited(&self, now: DateTime<Utc>) -> Option<String> {
        edited::format_last_edited_at(self.created_at, self.updated_at, now)
    }
}

/// Author of a message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    User,
    Bot,
}

/// A single chat entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub id: Id,
    pub thread_id: Id,
    #[serde(rename = "type")]
    pub kind: MessageType,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Only user-authored messages can be edited.
    pub fn is_editable(&self) -> bool {
        self.kind == MessageType::User
    }
}

/// Request payload for posting a message to a thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMessage {
    #[serde(rename = "type")]
    pub kind: MessageType,
    pub content: String,
}

impl NewMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            kind: MessageType::User,
            content: content.into(),
        }
    }
}

/// Request payload for creating a thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewThread {
    pub title: String,
}

/// Request payload for renaming a thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateThread {
    pub title: String,
}

/// Request payload for editing a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateMessage {
    pub content: String,
}

/// Error body returned by the API on 4xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
