use std::cell::RefCell;
use std::collections::VecDeque;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};

/// Replays canned responses in order and records every request it sees.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    replies: RefCell<VecDeque<Result<HttpResponse, ApiError>>>,
    seen: RefCell<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply(self, status: u16, body: &str) -> Self {
        self.replies
            .borrow_mut()
            .push_back(Ok(HttpResponse::new(status, body)));
        self
    }

    pub(crate) fn fail(self, message: &str) -> Self {
        self.replies
            .borrow_mut()
            .push_back(Err(ApiError::TransportError(message.to_string())));
        self
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.seen.borrow().clone()
    }

    pub(crate) fn calls(&self) -> usize {
        self.seen.borrow().len()
    }
}

impl Transport for ScriptedTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        self.seen.borrow_mut().push(request.clone());
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::TransportError("no scripted reply".to_string())))
    }
}

pub(crate) const THREAD_ID: &str = "11111111-1111-1111-1111-111111111111";
pub(crate) const USER_MESSAGE_ID: &str = "22222222-2222-2222-2222-222222222222";
pub(crate) const BOT_MESSAGE_ID: &str = "33333333-3333-3333-3333-333333333333";

pub(crate) fn thread_json(title: &str) -> String {
    format!(
        r#"{{"id":"{THREAD_ID}","title":"{title}","created_at":"2024-05-01T12:00:00Z","updated_at":"2024-05-01T12:00:00Z"}}"#
    )
}

pub(crate) fn messages_json() -> String {
    format!(
        r#"[
            {{"id":"{USER_MESSAGE_ID}","thread_id":"{THREAD_ID}","type":"user","content":"hello","created_at":"2024-05-01T12:00:01Z"}},
            {{"id":"{BOT_MESSAGE_ID}","thread_id":"{THREAD_ID}","type":"bot","content":"Echo: hello","created_at":"2024-05-01T12:00:02Z"}}
        ]"#
    )
}
