//! Form-driven write path: edit thread title, edit message, send message.
//!
//! # Design
//! A mutation runs in three steps. `prepare` reads the form field, rejects
//! blank input locally and builds the request. The host executes it. `finish`
//! maps the response onto an [`ActionOutcome`]. Every failure ends up as one
//! displayable string on the outcome, never as a panic or a propagated error.

use tracing::{debug, warn};
use url::form_urlencoded;

use crate::client::ChatClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::types::{Id, NewMessage, UpdateMessage, UpdateThread};

/// Decoded `application/x-www-form-urlencoded` submission.
#[derive(Debug, Clone, Default)]
pub struct FormData {
    fields: Vec<(String, String)>,
}

impl FormData {
    pub fn parse(body: &str) -> Self {
        Self {
            fields: form_urlencoded::parse(body.as_bytes()).into_owned().collect(),
        }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// First value submitted under `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Result handed back to the view after a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Leave the form for the given location.
    Redirect(String),
    /// Stay in place; the form can be cleared.
    Success,
    /// Stay on the form and show this text.
    Error(String),
}

impl ActionOutcome {
    pub fn is_ok(&self) -> bool {
        !matches!(self, ActionOutcome::Error(_))
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ActionOutcome::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// The three write flows of the thread view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    EditThreadTitle { thread_id: Id },
    EditMessage { thread_id: Id, message_id: Id },
    SendMessage { thread_id: Id },
}

impl Mutation {
    pub fn thread_id(&self) -> &Id {
        match self {
            Mutation::EditThreadTitle { thread_id }
            | Mutation::EditMessage { thread_id, .. }
            | Mutation::SendMessage { thread_id } => thread_id,
        }
    }

    /// Name of the form field this flow reads.
    pub fn field(&self) -> &'static str {
        match self {
            Mutation::EditThreadTitle { .. } => "title",
            Mutation::EditMessage { .. } => "content",
            Mutation::SendMessage { .. } => "message",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Mutation::EditThreadTitle { .. } => "Title",
            Mutation::EditMessage { .. } => "Content",
            Mutation::SendMessage { .. } => "Message",
        }
    }

    /// Validate the form and build the request. Blank input never gets here
    /// with a request.
    pub fn prepare(&self, client: &ChatClient, form: &FormData) -> Result<HttpRequest, ApiError> {
        let value = form
            .get(self.field())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or(ApiError::EmptyInput { label: self.label() })?;

        match self {
            Mutation::EditThreadTitle { thread_id } => client.build_update_thread(
                thread_id,
                &UpdateThread {
                    title: value.to_string(),
                },
            ),
            Mutation::EditMessage { message_id, .. } => client.build_update_message(
                message_id,
                &UpdateMessage {
                    content: value.to_string(),
                },
            ),
            Mutation::SendMessage { thread_id } => {
                client.build_create_message(thread_id, &NewMessage::user(value))
            }
        }
    }

    /// Interpret the round-trip result.
    pub fn finish(
        &self,
        client: &ChatClient,
        result: Result<HttpResponse, ApiError>,
    ) -> ActionOutcome {
        let checked = result.and_then(|response| match self {
            Mutation::EditThreadTitle { .. } => client.parse_update_thread(response),
            Mutation::EditMessage { .. } => client.parse_update_message(response),
            Mutation::SendMessage { .. } => client.parse_create_message(response),
        });

        match checked {
            Ok(()) => match self {
                Mutation::SendMessage { .. } => ActionOutcome::Success,
                _ => ActionOutcome::Redirect(format!("/chat/{}", self.thread_id())),
            },
            Err(err) => {
                warn!(field = self.field(), error = %err, "mutation failed");
                ActionOutcome::Error(self.describe(&err))
            }
        }
    }

    /// Validate, execute and interpret in one go.
    pub fn run<T: Transport>(
        &self,
        client: &ChatClient,
        transport: &T,
        form: &FormData,
    ) -> ActionOutcome {
        let request = match self.prepare(client, form) {
            Ok(request) => request,
            Err(err) => {
                debug!(field = self.field(), error = %err, "rejected before sending");
                return ActionOutcome::Error(self.describe(&err));
            }
        };
        debug!(method = request.method.as_str(), path = %request.path, "submitting");
        self.finish(client, transport.execute(&request))
    }

    /// User-facing sentence for a failure of this flow.
    pub fn describe(&self, err: &ApiError) -> String {
        match err {
            ApiError::EmptyInput { .. } | ApiError::TransportError(_) => err.to_string(),
            ApiError::ValidationError { message } => message
                .clone()
                .unwrap_or_else(|| self.invalid_fallback().to_string()),
            ApiError::Forbidden { message } => message
                .clone()
                .unwrap_or_else(|| self.forbidden_fallback()),
            ApiError::NotFound => match self {
                Mutation::EditMessage { .. } => "Message not found".to_string(),
                _ => "Thread not found".to_string(),
            },
            ApiError::UnexpectedStatus { status, .. } => {
                format!("Failed to {}: {status}", self.verb())
            }
            ApiError::Deserialization(_) | ApiError::Serialization(_) => {
                format!("Failed to {}: {err}", self.verb())
            }
        }
    }

    fn invalid_fallback(&self) -> &'static str {
        match self {
            Mutation::EditThreadTitle { .. } => "Invalid title",
            Mutation::EditMessage { .. } => "Invalid content",
            Mutation::SendMessage { .. } => "Invalid message data",
        }
    }

    /// Only message edits have a dedicated 403 wording; the other flows
    /// report the status like any other unexpected one.
    fn forbidden_fallback(&self) -> String {
        match self {
            Mutation::EditMessage { .. } => "Cannot edit this message".to_string(),
            _ => format!("Failed to {}: 403", self.verb()),
        }
    }

    fn verb(&self) -> &'static str {
        match self {
            Mutation::EditThreadTitle { .. } => "update title",
            Mutation::EditMessage { .. } => "update message",
            Mutation::SendMessage { .. } => "create message",
        }
    }
}
