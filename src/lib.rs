//! memchat - terminal chat client library
//!
//! This library provides a client for chat servers that keep a per-user
//! conversation and memory store behind three JSON endpoints
//! (`/login`, `/chat`, `/get_conversation`).
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `api`: wire types, the `ChatBackend` trait and its HTTP and fake implementations
//! - `client`: login, message exchange and history replay flows
//! - `session`: login/chat view state
//! - `transcript`: messages and the ordered transcript
//! - `view`: rendering surfaces and the shared transcript view
//! - `commands`: CLI command handlers
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use memchat::{ChatClient, Config};
//! use memchat::api::HttpBackend;
//! use memchat::view::{ChatView, TerminalRenderer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/memchat.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let backend = HttpBackend::new(&config.server)?;
//!     let client = ChatClient::new(Arc::new(backend), ChatView::new(TerminalRenderer::new()));
//!     client.login("alice").await;
//!     client.send_message("hello").await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod session;
pub mod transcript;
pub mod view;

// Re-export commonly used types
pub use api::{ChatBackend, Outcome};
pub use client::{ChatClient, HistoryStatus, LoginStatus, SendStatus};
pub use config::Config;
pub use error::{MemchatError, Result, TransportError};
pub use session::{Session, ViewState};
pub use transcript::{Message, Sender, Transcript};
