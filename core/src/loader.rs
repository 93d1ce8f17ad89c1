//! Read path for the thread view.
//!
//! # Design
//! The thread is fetched first; its messages are only requested once the
//! thread is known to exist. A 404 on the thread is kept apart from every
//! other failure so the view can show a dedicated "not found" state.

use thiserror::Error;
use tracing::{debug, warn};

use crate::client::ChatClient;
use crate::error::ApiError;
use crate::http::Transport;
use crate::types::{Id, Message, Thread};

/// Where the boundary sends the user to recover.
pub const NEW_CHAT_PATH: &str = "/chat/new";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoaderError {
    #[error("Thread not found")]
    NotFound,
    #[error("{0}")]
    Failed(String),
}

/// Everything the thread view renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadView {
    pub thread: Thread,
    pub messages: Vec<Message>,
}

impl ThreadView {
    /// Resolve a message for the edit form. Bot messages are refused.
    pub fn editable_message(&self, message_id: &Id) -> Result<&Message, String> {
        let message = self
            .messages
            .iter()
            .find(|m| &m.id == message_id)
            .ok_or_else(|| "Message not found".to_string())?;
        if !message.is_editable() {
            return Err("Bot messages cannot be edited".to_string());
        }
        Ok(message)
    }
}

/// Fetch a thread and its messages.
pub fn load_thread<T: Transport>(
    client: &ChatClient,
    transport: &T,
    thread_id: &Id,
) -> Result<ThreadView, LoaderError> {
    debug!(%thread_id, "loading thread");

    let thread = transport
        .execute(&client.build_get_thread(thread_id))
        .and_then(|response| client.parse_get_thread(response))
        .map_err(|err| match err {
            ApiError::NotFound => LoaderError::NotFound,
            other => failed("thread", other),
        })?;

    let messages = transport
        .execute(&client.build_list_messages(thread_id))
        .and_then(|response| client.parse_list_messages(response))
        .map_err(|err| failed("messages", err))?;

    debug!(%thread_id, messages = messages.len(), "thread loaded");
    Ok(ThreadView { thread, messages })
}

fn failed(what: &str, err: ApiError) -> LoaderError {
    warn!(resource = what, error = %err, "load failed");
    match err.status() {
        Some(status) => LoaderError::Failed(format!("Failed to fetch {what}: {status}")),
        None => LoaderError::Failed(err.to_string()),
    }
}

/// What the error boundary shows in place of the thread view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBoundary {
    pub heading: &'static str,
    pub detail: String,
    pub recovery_label: &'static str,
    pub recovery_href: &'static str,
}

impl ErrorBoundary {
    pub fn is_not_found(&self) -> bool {
        self.heading == "Thread Not Found"
    }
}

impl From<&LoaderError> for ErrorBoundary {
    fn from(err: &LoaderError) -> Self {
        let (heading, detail) = match err {
            LoaderError::NotFound => (
                "Thread Not Found",
                "This conversation may have been deleted or never existed.".to_string(),
            ),
            LoaderError::Failed(message) if message.is_empty() => {
                ("Something Went Wrong", "An unexpected error occurred.".to_string())
            }
            LoaderError::Failed(message) => ("Something Went Wrong", message.clone()),
        };
        Self {
            heading,
            detail,
            recovery_label: "Start a new chat",
            recovery_href: NEW_CHAT_PATH,
        }
    }
}
