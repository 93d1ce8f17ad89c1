//! Stateless HTTP request builder and response parser for the chat API.
//!
//! # Design
//! `ChatClient` holds a `base_url` and an optional bearer token and carries
//! no mutable state between calls. Each endpoint is split into a `build_*`
//! method that produces an `HttpRequest` and a `parse_*` method that consumes
//! an `HttpResponse`. The caller executes the round-trip in between.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{ErrorBody, Id, Message, NewMessage, NewThread, Thread, UpdateMessage, UpdateThread};

/// Synchronous, stateless client for the chat API.
#[derive(Debug, Clone)]
pub struct ChatClient {
    base_url: String,
    token: Option<String>,
}

impl ChatClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Attach a bearer credential to every request built from now on.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_threads(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/api/threads".to_string(), None)
    }

    pub fn build_create_thread(&self, input: &NewThread) -> Result<HttpRequest, ApiError> {
        let body = to_json(input)?;
        Ok(self.request(HttpMethod::Post, "/api/threads".to_string(), Some(body)))
    }

    pub fn build_get_thread(&self, thread_id: &Id) -> HttpRequest {
        self.request(HttpMethod::Get, format!("/api/threads/{thread_id}"), None)
    }

    pub fn build_list_messages(&self, thread_id: &Id) -> HttpRequest {
        self.request(HttpMethod::Get, format!("/api/threads/{thread_id}/messages"), None)
    }

    pub fn build_create_message(
        &self,
        thread_id: &Id,
        input: &NewMessage,
    ) -> Result<HttpRequest, ApiError> {
        let body = to_json(input)?;
        Ok(self.request(
            HttpMethod::Post,
            format!("/api/threads/{thread_id}/messages"),
            Some(body),
        ))
    }

    pub fn build_update_thread(
        &self,
        thread_id: &Id,
        input: &UpdateThread,
    ) -> Result<HttpRequest, ApiError> {
        let body = to_json(input)?;
        Ok(self.request(HttpMethod::Patch, format!("/api/threads/{thread_id}"), Some(body)))
    }

    pub fn build_update_message(
        &self,
        message_id: &Id,
        input: &UpdateMessage,
    ) -> Result<HttpRequest, ApiError> {
        let body = to_json(input)?;
        Ok(self.request(HttpMethod::Patch, format!("/api/messages/{message_id}"), Some(body)))
    }

    pub fn parse_list_threads(&self, response: HttpResponse) -> Result<Vec<Thread>, ApiError> {
        check_status(&response)?;
        from_json(&response.body)
    }

    pub fn parse_create_thread(&self, response: HttpResponse) -> Result<Thread, ApiError> {
        check_status(&response)?;
        from_json(&response.body)
    }

    pub fn parse_get_thread(&self, response: HttpResponse) -> Result<Thread, ApiError> {
        check_status(&response)?;
        from_json(&response.body)
    }

    pub fn parse_list_messages(&self, response: HttpResponse) -> Result<Vec<Message>, ApiError> {
        check_status(&response)?;
        from_json(&response.body)
    }

    /// Mutations only care about the status; the server's echo of the
    /// resource is discarded because the loader re-fetches afterwards.
    pub fn parse_create_message(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    pub fn parse_update_thread(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    pub fn parse_update_message(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    fn request(&self, method: HttpMethod, path: String, body: Option<String>) -> HttpRequest {
        let mut headers = Vec::new();
        if let Some(token) = &self.token {
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }
        if body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers,
            body,
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::Serialization(e.to_string()))
}

fn from_json<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
pub(crate) fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    match response.status {
        400 => Err(ApiError::ValidationError {
            message: error_message(&response.body),
        }),
        403 => Err(ApiError::Forbidden {
            message: error_message(&response.body),
        }),
        404 => Err(ApiError::NotFound),
        status => Err(ApiError::UnexpectedStatus {
            status,
            body: response.body.clone(),
        }),
    }
}

/// Pull the `error` string out of a JSON error body. Blank messages count as
/// absent so callers fall back to their own wording.
fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|b| b.error)
        .filter(|e| !e.trim().is_empty())
}
