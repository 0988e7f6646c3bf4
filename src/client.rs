//! Chat client
//!
//! [`ChatClient`] ties a [`ChatBackend`] to a [`ChatView`] and a
//! [`Session`]. It implements the three user-facing flows:
//!
//! - **login**: submit a username, switch to the chat view, replay history
//! - **send**: render the user's message right away, then render the reply
//! - **history**: clear the transcript and replay the server's conversation
//!
//! Failures follow one rule. An application-level rejection is shown as an
//! alert and the flow stops. A transport failure is logged and nothing
//! visible changes.

use crate::api::{ChatBackend, MemoryRecord, Outcome};
use crate::session::Session;
use crate::transcript::Message;
use crate::view::ChatView;

use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::JoinHandle;

/// How a login attempt ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginStatus {
    /// Blank username; nothing was sent
    Ignored,
    /// Logged in; carries the result of the history replay that followed
    LoggedIn(HistoryStatus),
    /// Server refused the login; an alert was shown
    Rejected,
    /// No usable answer; logged only
    TransportFailed,
}

/// How a message send ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendStatus {
    /// Blank message; nothing was rendered or sent
    Ignored,
    /// Reply rendered as a bot message
    Answered,
    /// Server returned an error; an alert was shown
    Rejected,
    /// No usable answer; logged only
    TransportFailed,
}

/// How a history replay ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryStatus {
    /// Transcript replaced with this many messages
    Replayed(usize),
    /// Server returned an error; transcript cleared and an alert shown
    Rejected,
    /// No usable answer; transcript untouched
    TransportFailed,
}

/// Chat client driving a backend and a view
///
/// Cloning is cheap; clones share the backend, view and session.
#[derive(Clone)]
pub struct ChatClient {
    backend: Arc<dyn ChatBackend>,
    view: ChatView,
    session: Arc<Mutex<Session>>,
}

impl ChatClient {
    /// Create a client in the login view
    pub fn new(backend: Arc<dyn ChatBackend>, view: ChatView) -> Self {
        Self {
            backend,
            view,
            session: Arc::new(Mutex::new(Session::new())),
        }
    }

    /// Transcript view this client renders into
    pub fn view(&self) -> &ChatView {
        &self.view
    }

    /// Copy of the current session state
    pub fn session(&self) -> Session {
        self.lock_session().clone()
    }

    /// Submit a username
    ///
    /// Blank input is ignored without contacting the server. On success the
    /// chat view is shown (first time only) and the history is replayed.
    pub async fn login(&self, input: &str) -> LoginStatus {
        let username = input.trim();
        if username.is_empty() {
            tracing::debug!("Ignoring blank username");
            return LoginStatus::Ignored;
        }

        tracing::info!("Logging in as {}", username);
        match self.backend.login(username).await {
            Outcome::Success(()) => {
                let entered = self.lock_session().enter_chat(username);
                if entered {
                    self.view.show_chat(username);
                }
                LoginStatus::LoggedIn(self.load_history().await)
            }
            Outcome::Rejected(message) => {
                tracing::warn!("Login rejected for {}: {}", username, message);
                self.view.alert(&message);
                LoginStatus::Rejected
            }
            Outcome::Transport(e) => {
                tracing::error!("Login request failed: {}", e);
                LoginStatus::TransportFailed
            }
        }
    }

    /// Send a message and wait for its reply
    ///
    /// The user's message is rendered before the request goes out.
    pub async fn send_message(&self, input: &str) -> SendStatus {
        match self.render_outgoing(input) {
            Some(text) => self.deliver(text).await,
            None => SendStatus::Ignored,
        }
    }

    /// Send a message without waiting for its reply
    ///
    /// The user's message is rendered before this returns. The request runs
    /// on its own task, so several sends can be in flight at once and their
    /// replies render in completion order. Returns `None` for blank input.
    pub fn spawn_send(&self, input: &str) -> Option<JoinHandle<SendStatus>> {
        let text = self.render_outgoing(input)?;
        let client = self.clone();
        Some(tokio::spawn(async move { client.deliver(text).await }))
    }

    /// Replace the transcript with the server's stored conversation
    pub async fn load_history(&self) -> HistoryStatus {
        tracing::debug!("Loading conversation history");
        match self.backend.conversation().await {
            Outcome::Success(messages) => {
                let count = self.view.replace_all(messages);
                tracing::info!("Replayed {} messages", count);
                HistoryStatus::Replayed(count)
            }
            Outcome::Rejected(message) => {
                tracing::warn!("History load rejected: {}", message);
                self.view.clear();
                self.view.alert(&message);
                HistoryStatus::Rejected
            }
            Outcome::Transport(e) => {
                tracing::error!("History request failed: {}", e);
                HistoryStatus::TransportFailed
            }
        }
    }

    /// Fetch the server's memories about the user
    ///
    /// Returns `None` after alerting (rejection) or logging (transport).
    pub async fn list_memories(&self) -> Option<Vec<MemoryRecord>> {
        match self.backend.list_memories().await {
            Outcome::Success(memories) => Some(memories),
            Outcome::Rejected(message) => {
                tracing::warn!("Memory listing rejected: {}", message);
                self.view.alert(&message);
                None
            }
            Outcome::Transport(e) => {
                tracing::error!("Memory listing request failed: {}", e);
                None
            }
        }
    }

    /// Ask the server to forget everything about the user
    ///
    /// Returns the server's status text, or `None` after alerting
    /// (rejection) or logging (transport).
    pub async fn delete_memories(&self) -> Option<String> {
        match self.backend.delete_memories().await {
            Outcome::Success(status) => {
                tracing::info!("Memories deleted: {}", status);
                Some(status)
            }
            Outcome::Rejected(message) => {
                tracing::warn!("Memory deletion rejected: {}", message);
                self.view.alert(&message);
                None
            }
            Outcome::Transport(e) => {
                tracing::error!("Memory deletion request failed: {}", e);
                None
            }
        }
    }

    fn render_outgoing(&self, input: &str) -> Option<String> {
        let text = input.trim();
        if text.is_empty() {
            return None;
        }
        self.view.append(Message::user(text));
        Some(text.to_string())
    }

    async fn deliver(&self, text: String) -> SendStatus {
        tracing::debug!("Sending message ({} chars)", text.len());
        match self.backend.chat(&text).await {
            Outcome::Success(reply) => {
                self.view.append(Message::bot(reply));
                SendStatus::Answered
            }
            Outcome::Rejected(message) => {
                tracing::warn!("Message rejected: {}", message);
                self.view.alert(&message);
                SendStatus::Rejected
            }
            Outcome::Transport(e) => {
                tracing::error!("Chat request failed: {}", e);
                SendStatus::TransportFailed
            }
        }
    }

    fn lock_session(&self) -> MutexGuard<'_, Session> {
        self.session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatClient")
            .field("backend", &self.backend)
            .field("view", &self.view)
            .field("session", &self.session())
            .finish()
    }
}
