//! Chat server API
//!
//! This module defines the [`ChatBackend`] trait that the client drives,
//! and the [`Outcome`] every call resolves to. Concrete backends live in
//! submodules:
//!
//! - [`http::HttpBackend`] talks JSON over HTTP to a real server.
//! - [`fake::FakeBackend`] replays scripted replies in-process for tests.
//!
//! # Outcomes
//!
//! Every call ends in exactly one of three states:
//!
//! - `Success`: the server answered with the expected payload.
//! - `Rejected`: the server answered with an application-level error
//!   (an `error` field, or a login without `success`).
//! - `Transport`: no usable answer arrived. Connection failures, timeouts
//!   and malformed bodies are not told apart.

use crate::error::{MemchatError, TransportError};
use crate::transcript::Message;

pub mod fake;
pub mod http;
pub mod types;

pub use fake::{BackendCall, FakeBackend, Scripted};
pub use http::HttpBackend;
pub use types::MemoryRecord;

/// Result of one request to the chat server
#[derive(Debug)]
pub enum Outcome<T> {
    /// The server returned the expected payload
    Success(T),
    /// The server returned an application-level error message
    Rejected(String),
    /// The exchange failed before a usable answer arrived
    Transport(TransportError),
}

impl<T> Outcome<T> {
    /// True for [`Outcome::Success`]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Collapse into a `Result`, for callers that treat both failure kinds
    /// as fatal
    ///
    /// # Errors
    ///
    /// Returns [`MemchatError::Rejected`] or [`MemchatError::Transport`]
    pub fn into_result(self) -> std::result::Result<T, MemchatError> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Rejected(message) => Err(MemchatError::Rejected(message)),
            Self::Transport(error) => Err(MemchatError::Transport(error)),
        }
    }
}

impl<T> From<TransportError> for Outcome<T> {
    fn from(error: TransportError) -> Self {
        Self::Transport(error)
    }
}

/// Operations the chat server exposes to the client
///
/// Implementations hold whatever session credentials the server issued at
/// login (for HTTP, a cookie jar) and present them on later calls.
#[async_trait::async_trait]
pub trait ChatBackend: Send + Sync + std::fmt::Debug {
    /// Start or rebind a server session for `username`
    async fn login(&self, username: &str) -> Outcome<()>;

    /// Send one chat message and return the bot's reply text
    async fn chat(&self, message: &str) -> Outcome<String>;

    /// Fetch the full stored conversation in server order
    async fn conversation(&self) -> Outcome<Vec<Message>>;

    /// Fetch everything the server remembers about the user
    async fn list_memories(&self) -> Outcome<Vec<MemoryRecord>>;

    /// Ask the server to forget everything about the user, returning its
    /// status text
    async fn delete_memories(&self) -> Outcome<String>;
}
