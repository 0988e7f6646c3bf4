/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes three top-level command modules:

- `chat`: Interactive chat session
- `history`: Log in and print the stored conversation
- `send`: Log in and send a single message

The interactive handler drives a [`ChatClient`]. The one-shot handlers call
the backend directly and turn any failure into an error exit.
*/

use crate::api::{ChatBackend, HttpBackend};
use crate::client::ChatClient;
use crate::config::Config;
use crate::error::{MemchatError, Result};
use crate::transcript::Message;
use crate::view::{ChatView, TerminalRenderer};
use std::sync::Arc;

// Special commands parser for the chat loop
pub mod special_commands;

/// Username from config, or a configuration error explaining how to set one
fn require_username(config: &Config) -> Result<String> {
    config.chat.username.clone().ok_or_else(|| {
        MemchatError::Config(
            "A username is required: pass --username or set chat.username".to_string(),
        )
        .into()
    })
}

/// Log in on `backend` and fetch the stored conversation
///
/// # Errors
///
/// Returns [`MemchatError::Rejected`] or [`MemchatError::Transport`] when
/// either call fails
pub async fn fetch_history(backend: &dyn ChatBackend, username: &str) -> Result<Vec<Message>> {
    backend.login(username.trim()).await.into_result()?;
    Ok(backend.conversation().await.into_result()?)
}

/// Log in on `backend`, send one message and return the reply text
///
/// # Errors
///
/// Returns [`MemchatError::Config`] for a blank message, and
/// [`MemchatError::Rejected`] or [`MemchatError::Transport`] when a call
/// fails
pub async fn send_once(backend: &dyn ChatBackend, username: &str, message: &str) -> Result<String> {
    let message = message.trim();
    if message.is_empty() {
        return Err(MemchatError::Config("Message cannot be blank".to_string()).into());
    }
    backend.login(username.trim()).await.into_result()?;
    Ok(backend.chat(message).await.into_result()?)
}

// Chat command handler
pub mod chat {
    //! Interactive chat handler.
    //!
    //! Runs a readline loop over a [`ChatClient`]. Until a login succeeds
    //! every line is a username. After that, lines are chat messages or
    //! special commands. Each message is sent on its own task so the prompt
    //! comes back right away.

    use super::*;
    use crate::api::MemoryRecord;
    use crate::client::SendStatus;
    use crate::commands::special_commands::{parse_special_command, print_help, SpecialCommand};
    use crate::session::ViewState;
    use colored::Colorize;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;
    use tokio::task::JoinHandle;

    /// Start interactive chat mode
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client or the line editor cannot be created
    pub async fn run_chat(config: Config) -> Result<()> {
        tracing::info!("Starting interactive chat with {}", config.server.base_url);

        let backend = HttpBackend::new(&config.server)?;
        let mut rl = DefaultEditor::new().map_err(MemchatError::Readline)?;

        // Replies arrive on spawned tasks while readline owns the terminal
        let renderer = match rl.create_external_printer() {
            Ok(printer) => TerminalRenderer::with_printer(printer),
            Err(e) => {
                tracing::debug!("No external printer ({}), writing to stdout", e);
                TerminalRenderer::new()
            }
        };
        let client = ChatClient::new(Arc::new(backend), ChatView::new(renderer));

        if config.chat.show_banner {
            print_welcome_banner(&config.server.base_url);
        }

        if let Some(username) = &config.chat.username {
            client.login(username).await;
        }

        let mut pending: Vec<JoinHandle<SendStatus>> = Vec::new();

        loop {
            let prompt = client.session().prompt();
            match rl.readline(&prompt) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    rl.add_history_entry(trimmed)
                        .map_err(MemchatError::Readline)?;

                    let command = parse_special_command(trimmed);
                    if command == Ok(SpecialCommand::Exit) {
                        break;
                    }

                    if client.session().view() == ViewState::Login {
                        client.login(trimmed).await;
                        continue;
                    }

                    match command {
                        Ok(SpecialCommand::Help) => print_help(),
                        Ok(SpecialCommand::ShowStatus) => {
                            pending.retain(|handle| !handle.is_finished());
                            print_status(&client, pending.len());
                        }
                        Ok(SpecialCommand::ReloadHistory) => {
                            client.load_history().await;
                        }
                        Ok(SpecialCommand::ListMemories) => {
                            if let Some(memories) = client.list_memories().await {
                                print_memories(&memories);
                            }
                        }
                        Ok(SpecialCommand::ForgetMemories) => {
                            if let Some(status) = client.delete_memories().await {
                                println!("{}", status.green());
                            }
                        }
                        Ok(SpecialCommand::Exit) => break,
                        Ok(SpecialCommand::None) => {
                            pending.retain(|handle| !handle.is_finished());
                            if let Some(handle) = client.spawn_send(trimmed) {
                                pending.push(handle);
                            }
                        }
                        Err(e) => eprintln!("{}", e.to_string().red()),
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }
        }

        if !pending.is_empty() {
            tracing::debug!("Waiting for {} pending replies", pending.len());
        }
        for handle in pending {
            if let Err(e) = handle.await {
                tracing::warn!("Send task ended abnormally: {}", e);
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    /// Display welcome banner at the start of interactive chat mode
    fn print_welcome_banner(server: &str) {
        println!("{}", "memchat".bold());
        println!("Server: {}", server.cyan());
        println!("Enter a username to log in. Type /exit to leave.\n");
    }

    fn print_status(client: &ChatClient, in_flight: usize) {
        let session = client.session();
        println!("View:       {}", session.view().colored_tag());
        println!("User:       {}", session.username().unwrap_or("-"));
        println!("Messages:   {}", client.view().len());
        println!("In flight:  {}", in_flight);
    }

    fn print_memories(memories: &[MemoryRecord]) {
        if memories.is_empty() {
            println!("{}", "No memories stored yet.".dimmed());
            return;
        }
        println!("{}", format!("{} memories:", memories.len()).bold());
        for memory in memories {
            println!("  - {}", memory.memory);
        }
    }
}

// History command handler
pub mod history {
    //! One-shot history printer.

    use super::*;
    use crate::api::types::ConversationItem;
    use crate::view::Renderer;

    /// Log in and print the stored conversation
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration; `chat.username` must be set
    /// * `json` - Print JSON instead of colored lines
    ///
    /// # Errors
    ///
    /// Returns error on a missing username or any failed call
    pub async fn show_history(config: &Config, json: bool) -> Result<()> {
        let username = require_username(config)?;
        let backend = HttpBackend::new(&config.server)?;
        let messages = fetch_history(&backend, &username).await?;

        if json {
            let items: Vec<ConversationItem> =
                messages.into_iter().map(ConversationItem::from).collect();
            println!("{}", serde_json::to_string_pretty(&items)?);
        } else {
            let mut renderer = TerminalRenderer::new();
            for message in &messages {
                renderer.append(message);
            }
        }
        Ok(())
    }
}

// Send command handler
pub mod send {
    //! One-shot message sender.

    use super::*;

    /// Log in, send one message and print the reply
    ///
    /// # Errors
    ///
    /// Returns error on a missing username, a blank message, or any failed
    /// call
    pub async fn send_message(config: &Config, message: &str) -> Result<()> {
        let username = require_username(config)?;
        let backend = HttpBackend::new(&config.server)?;
        let reply = send_once(&backend, &username, message).await?;
        println!("{}", reply);
        Ok(())
    }
}
