//! Synchronous client core for the chat thread service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). On top of the raw client sit
//! the thread loader, the three form mutations and a session type that
//! chains "mutate, then reload" explicitly.
//!
//! # Design
//! - `ChatClient` is stateless apart from its base URL and bearer token.
//! - Each endpoint is split into `build_*` and `parse_*` so the I/O boundary
//!   is explicit; `Transport` is the only seam that performs I/O.
//! - Mutation failures become a display string on `ActionOutcome`; loader
//!   failures become `LoaderError`, with not-found kept distinct.
//! - `UreqTransport` (default `ureq` feature) is the blocking transport shared
//!   by the CLI and the integration tests.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod edited;
pub mod error;
pub mod guard;
pub mod http;
pub mod loader;
pub mod mutation;
pub mod session;
#[cfg(feature = "ureq")]
pub mod transport;
pub mod types;

#[cfg(test)]
mod testing;

pub use client::ChatClient;
pub use edited::{format_last_edited, format_last_edited_at, is_edited};
pub use error::ApiError;
pub use guard::{EditGuard, GuardAction, Key};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use loader::{load_thread, ErrorBoundary, LoaderError, ThreadView};
pub use mutation::{ActionOutcome, FormData, Mutation};
pub use session::ThreadSession;
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use types::{
    ErrorBody, Id, Message, MessageType, NewMessage, NewThread, Thread, UpdateMessage,
    UpdateThread,
};
