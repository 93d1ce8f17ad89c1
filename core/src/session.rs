//! One navigation's worth of state for a thread view.
//!
//! A successful mutation is followed by a synchronous reload of the thread
//! before the action returns, so the caller always renders fresh data.

use tracing::debug;

use crate::client::ChatClient;
use crate::http::Transport;
use crate::loader::{load_thread, ErrorBoundary, LoaderError, ThreadView};
use crate::mutation::{ActionOutcome, FormData, Mutation};
use crate::types::Id;

pub struct ThreadSession<T> {
    client: ChatClient,
    transport: T,
    thread_id: Id,
    current: Option<Result<ThreadView, LoaderError>>,
}

impl<T: Transport> ThreadSession<T> {
    pub fn new(client: ChatClient, transport: T, thread_id: Id) -> Self {
        Self {
            client,
            transport,
            thread_id,
            current: None,
        }
    }

    pub fn thread_id(&self) -> &Id {
        &self.thread_id
    }

    /// Run the loader and keep its result as the current route state.
    pub fn load(&mut self) -> Result<&ThreadView, &LoaderError> {
        let result = load_thread(&self.client, &self.transport, &self.thread_id);
        Result::as_ref(self.current.insert(result))
    }

    /// The last loaded view, if the last load succeeded.
    pub fn view(&self) -> Option<&ThreadView> {
        self.current.as_ref().and_then(|r| r.as_ref().ok())
    }

    /// The boundary to render if the last load failed.
    pub fn boundary(&self) -> Option<ErrorBoundary> {
        match &self.current {
            Some(Err(err)) => Some(ErrorBoundary::from(err)),
            _ => None,
        }
    }

    /// Submit a form for a mutation bound to this thread, then revalidate.
    ///
    /// Mutations are only built by the helpers below, so the reload always
    /// targets the thread the mutation touched. On error the current view is
    /// left as it was.
    fn submit(&mut self, mutation: Mutation, form: &FormData) -> ActionOutcome {
        let outcome = mutation.run(&self.client, &self.transport, form);
        if outcome.is_ok() {
            debug!(thread_id = %self.thread_id, "revalidating after mutation");
            let _ = self.load();
        }
        outcome
    }

    pub fn edit_title(&mut self, form: &FormData) -> ActionOutcome {
        let thread_id = self.thread_id.clone();
        self.submit(Mutation::EditThreadTitle { thread_id }, form)
    }

    pub fn edit_message(&mut self, message_id: Id, form: &FormData) -> ActionOutcome {
        let thread_id = self.thread_id.clone();
        self.submit(Mutation::EditMessage { thread_id, message_id }, form)
    }

    pub fn send_message(&mut self, form: &FormData) -> ActionOutcome {
        let thread_id = self.thread_id.clone();
        self.submit(Mutation::SendMessage { thread_id }, form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{messages_json, thread_json, ScriptedTransport, THREAD_ID, USER_MESSAGE_ID};

    fn session(transport: ScriptedTransport) -> ThreadSession<ScriptedTransport> {
        ThreadSession::new(
            ChatClient::new("http://api.test"),
            transport,
            Id::from(THREAD_ID),
        )
    }

    #[test]
    fn successful_edit_reloads_the_thread() {
        let transport = ScriptedTransport::new()
            .reply(200, &thread_json("Old"))
            .reply(200, "[]")
            .reply(200, "{}")
            .reply(200, &thread_json("New"))
            .reply(200, &messages_json());
        let mut session = session(transport);

        assert_eq!(session.load().unwrap().thread.title, "Old");
        let outcome = session.edit_title(&FormData::from_pairs([("title", "New")]));

        assert_eq!(outcome, ActionOutcome::Redirect(format!("/chat/{THREAD_ID}")));
        let view = session.view().unwrap();
        assert_eq!(view.thread.title, "New");
        assert_eq!(view.messages.len(), 2);
        assert_eq!(session.transport.calls(), 5);
    }

    #[test]
    fn revalidation_targets_the_session_thread() {
        let transport = ScriptedTransport::new()
            .reply(200, "{}")
            .reply(200, &thread_json("Renamed"))
            .reply(200, &messages_json());
        let mut session = session(transport);

        session.edit_title(&FormData::from_pairs([("title", "Renamed")]));

        let paths: Vec<String> = session
            .transport
            .requests()
            .into_iter()
            .map(|r| r.path)
            .collect();
        assert_eq!(
            paths,
            vec![
                format!("http://api.test/api/threads/{THREAD_ID}"),
                format!("http://api.test/api/threads/{THREAD_ID}"),
                format!("http://api.test/api/threads/{THREAD_ID}/messages"),
            ]
        );
        assert_eq!(session.thread_id(), &Id::from(THREAD_ID));
    }

    #[test]
    fn failed_edit_keeps_the_current_view() {
        let transport = ScriptedTransport::new()
            .reply(200, &thread_json("Old"))
            .reply(200, &messages_json())
            .reply(403, r#"{"error":"Bot messages cannot be edited"}"#);
        let mut session = session(transport);
        session.load().unwrap();

        let outcome = session.edit_message(
            Id::from(USER_MESSAGE_ID),
            &FormData::from_pairs([("content", "changed")]),
        );

        assert_eq!(outcome.error(), Some("Bot messages cannot be edited"));
        assert_eq!(session.view().unwrap().thread.title, "Old");
        assert_eq!(session.transport.calls(), 3, "no revalidation after failure");
    }

    #[test]
    fn blank_message_is_rejected_without_any_request() {
        let mut session = session(ScriptedTransport::new());
        let outcome = session.send_message(&FormData::from_pairs([("message", "   ")]));
        assert_eq!(outcome.error(), Some("Message cannot be empty"));
        assert_eq!(session.transport.calls(), 0);
    }

    #[test]
    fn sent_message_appears_after_revalidation() {
        let transport = ScriptedTransport::new()
            .reply(201, "{}")
            .reply(200, &thread_json("Chat"))
            .reply(200, &messages_json());
        let mut session = session(transport);

        let outcome = session.send_message(&FormData::from_pairs([("message", "hello")]));
        assert_eq!(outcome, ActionOutcome::Success);
        assert_eq!(session.view().unwrap().messages[0].content, "hello");
    }

    #[test]
    fn missing_thread_exposes_not_found_boundary() {
        let mut session = session(ScriptedTransport::new().reply(404, ""));
        assert!(session.load().is_err());
        assert!(session.view().is_none());
        assert!(session.boundary().unwrap().is_not_found());
    }
}
