//! JSON-over-HTTP backend
//!
//! [`HttpBackend`] talks to the chat server's HTTP endpoints. The server
//! tracks the logged-in user with a session cookie, so the underlying
//! `reqwest` client keeps a cookie store and every call after `/login`
//! presents it.
//!
//! Status codes are not inspected: the server answers `401` with a JSON
//! `{"error": ...}` body, and that body is handled like any other reply.

use crate::api::types::{
    ChatReply, ChatRequest, ConversationReply, DeleteReply, LoginReply, LoginRequest,
    MemoriesReply,
};
use crate::api::{ChatBackend, MemoryRecord, Outcome};
use crate::config::ServerConfig;
use crate::error::{MemchatError, Result, TransportError};
use crate::transcript::Message;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// Resolved endpoint URLs
#[derive(Debug, Clone)]
struct Endpoints {
    login: Url,
    chat: Url,
    conversation: Url,
    list_memories: Url,
    delete_memories: Url,
}

impl Endpoints {
    fn resolve(base: &Url) -> std::result::Result<Self, url::ParseError> {
        // Join relative to the base path, keeping any prefix like `/api`.
        let mut base = base.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            login: base.join("login")?,
            chat: base.join("chat")?,
            conversation: base.join("get_conversation")?,
            list_memories: base.join("list_memories")?,
            delete_memories: base.join("delete_memories")?,
        })
    }
}

/// Chat backend speaking JSON over HTTP
///
/// # Examples
///
/// ```
/// use memchat::api::HttpBackend;
/// use memchat::config::ServerConfig;
///
/// let backend = HttpBackend::new(&ServerConfig::default());
/// assert!(backend.is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    endpoints: Endpoints,
}

impl HttpBackend {
    /// Create a backend from server settings
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is invalid or the HTTP client cannot be
    /// built
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let base = Url::parse(&config.base_url).map_err(|e| {
            MemchatError::Config(format!("Invalid server base_url '{}': {}", config.base_url, e))
        })?;

        let mut builder = Client::builder()
            .cookie_store(true)
            .user_agent(config.user_agent.clone());
        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        let client = builder.build().map_err(MemchatError::Http)?;

        Self::with_client(client, &base)
    }

    /// Create a backend around an existing client
    ///
    /// The client should have a cookie store enabled, otherwise the server
    /// will not recognise the session after login.
    ///
    /// # Errors
    ///
    /// Returns error if endpoint URLs cannot be derived from `base`
    pub fn with_client(client: Client, base: &Url) -> Result<Self> {
        let endpoints = Endpoints::resolve(base).map_err(|e| {
            MemchatError::Config(format!("Cannot derive endpoints from '{}': {}", base, e))
        })?;
        tracing::debug!("Chat server endpoints: {:?}", endpoints);
        Ok(Self { client, endpoints })
    }

    async fn exchange<R: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> std::result::Result<R, TransportError> {
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().clone();
        let body = response.bytes().await?;
        tracing::debug!("{} -> {} ({} bytes)", url, status, body.len());
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait::async_trait]
impl ChatBackend for HttpBackend {
    async fn login(&self, username: &str) -> Outcome<()> {
        let request = self
            .client
            .post(self.endpoints.login.clone())
            .json(&LoginRequest { username });
        match self.exchange::<LoginReply>(request).await {
            Ok(reply) => reply.into_outcome(),
            Err(e) => e.into(),
        }
    }

    async fn chat(&self, message: &str) -> Outcome<String> {
        let request = self
            .client
            .post(self.endpoints.chat.clone())
            .json(&ChatRequest { message });
        match self.exchange::<ChatReply>(request).await {
            Ok(reply) => reply.into_outcome(),
            Err(e) => e.into(),
        }
    }

    async fn conversation(&self) -> Outcome<Vec<Message>> {
        let request = self.client.get(self.endpoints.conversation.clone());
        match self.exchange::<ConversationReply>(request).await {
            Ok(reply) => reply.into_outcome(),
            Err(e) => e.into(),
        }
    }

    async fn list_memories(&self) -> Outcome<Vec<MemoryRecord>> {
        let request = self.client.get(self.endpoints.list_memories.clone());
        match self.exchange::<MemoriesReply>(request).await {
            Ok(reply) => reply.into_outcome(),
            Err(e) => e.into(),
        }
    }

    async fn delete_memories(&self) -> Outcome<String> {
        let request = self.client.post(self.endpoints.delete_memories.clone());
        match self.exchange::<DeleteReply>(request).await {
            Ok(reply) => reply.into_outcome(),
            Err(e) => e.into(),
        }
    }
}
