//! In-process scripted backend for tests
//!
//! [`FakeBackend`] answers each call with the next reply queued for that
//! endpoint and records every call it receives. A call with nothing queued
//! ends in a transport failure, the same way an unreachable server would.
//!
//! # Example
//!
//! ```
//! use memchat::api::{BackendCall, ChatBackend, FakeBackend, Scripted};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let backend = FakeBackend::new();
//! backend.script_chat(Scripted::Success("hi".to_string()));
//!
//! let reply = backend.chat("hello").await;
//! assert!(reply.is_success());
//! assert_eq!(backend.calls(), vec![BackendCall::Chat("hello".to_string())]);
//! # }
//! ```

use crate::api::{ChatBackend, MemoryRecord, Outcome};
use crate::error::TransportError;
use crate::transcript::Message;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Reply queued on a [`FakeBackend`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scripted<T> {
    /// Answer with this payload
    Success(T),
    /// Answer with this application-level error
    Rejected(String),
    /// Fail the exchange with this description
    TransportFailure(String),
}

impl<T> Scripted<T> {
    fn into_outcome(self) -> Outcome<T> {
        match self {
            Self::Success(value) => Outcome::Success(value),
            Self::Rejected(message) => Outcome::Rejected(message),
            Self::TransportFailure(reason) => {
                Outcome::Transport(TransportError::Malformed(reason))
            }
        }
    }
}

/// One call received by a [`FakeBackend`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    Login(String),
    Chat(String),
    Conversation,
    ListMemories,
    DeleteMemories,
}

#[derive(Debug)]
struct Queued<T> {
    delay: Option<Duration>,
    reply: Scripted<T>,
}

#[derive(Debug, Default)]
struct FakeState {
    calls: Vec<BackendCall>,
    login: VecDeque<Queued<()>>,
    chat: VecDeque<Queued<String>>,
    conversation: VecDeque<Queued<Vec<Message>>>,
    memories: VecDeque<Queued<Vec<MemoryRecord>>>,
    delete: VecDeque<Queued<String>>,
}

/// Scripted [`ChatBackend`]
///
/// Clones share the same queues and call log.
#[derive(Debug, Clone, Default)]
pub struct FakeBackend {
    state: Arc<Mutex<FakeState>>,
}

impl FakeBackend {
    /// Create a backend with nothing queued
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call received so far, oldest first
    pub fn calls(&self) -> Vec<BackendCall> {
        self.lock().calls.clone()
    }

    /// Queue the next `/login` reply
    pub fn script_login(&self, reply: Scripted<()>) {
        self.lock().login.push_back(Queued { delay: None, reply });
    }

    /// Queue the next `/chat` reply
    pub fn script_chat(&self, reply: Scripted<String>) {
        self.script_chat_after(Duration::ZERO, reply);
    }

    /// Queue the next `/chat` reply, delivered after `delay`
    pub fn script_chat_after(&self, delay: Duration, reply: Scripted<String>) {
        let delay = (!delay.is_zero()).then_some(delay);
        self.lock().chat.push_back(Queued { delay, reply });
    }

    /// Queue the next `/get_conversation` reply
    pub fn script_conversation(&self, reply: Scripted<Vec<Message>>) {
        self.lock()
            .conversation
            .push_back(Queued { delay: None, reply });
    }

    /// Queue the next `/list_memories` reply
    pub fn script_memories(&self, reply: Scripted<Vec<MemoryRecord>>) {
        self.lock().memories.push_back(Queued { delay: None, reply });
    }

    /// Queue the next `/delete_memories` reply
    pub fn script_delete(&self, reply: Scripted<String>) {
        self.lock().delete.push_back(Queued { delay: None, reply });
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn answer<T>(queued: Option<Queued<T>>, endpoint: &str) -> Outcome<T> {
        match queued {
            Some(Queued { delay, reply }) => {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                reply.into_outcome()
            }
            None => TransportError::Malformed(format!("no reply scripted for {}", endpoint)).into(),
        }
    }
}

#[async_trait::async_trait]
impl ChatBackend for FakeBackend {
    async fn login(&self, username: &str) -> Outcome<()> {
        let queued = {
            let mut state = self.lock();
            state.calls.push(BackendCall::Login(username.to_string()));
            state.login.pop_front()
        };
        Self::answer(queued, "/login").await
    }

    async fn chat(&self, message: &str) -> Outcome<String> {
        let queued = {
            let mut state = self.lock();
            state.calls.push(BackendCall::Chat(message.to_string()));
            state.chat.pop_front()
        };
        Self::answer(queued, "/chat").await
    }

    async fn conversation(&self) -> Outcome<Vec<Message>> {
        let queued = {
            let mut state = self.lock();
            state.calls.push(BackendCall::Conversation);
            state.conversation.pop_front()
        };
        Self::answer(queued, "/get_conversation").await
    }

    async fn list_memories(&self) -> Outcome<Vec<MemoryRecord>> {
        let queued = {
            let mut state = self.lock();
            state.calls.push(BackendCall::ListMemories);
            state.memories.pop_front()
        };
        Self::answer(queued, "/list_memories").await
    }

    async fn delete_memories(&self) -> Outcome<String> {
        let queued = {
            let mut state = self.lock();
            state.calls.push(BackendCall::DeleteMemories);
            state.delete.pop_front()
        };
        Self::answer(queued, "/delete_memories").await
    }
}
