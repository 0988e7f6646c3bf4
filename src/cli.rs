//! Command-line interface definition for memchat
//!
//! This module defines the CLI structure using clap's derive API,
//! providing an interactive chat command plus one-shot history and send
//! commands.

use clap::{Parser, Subcommand};

/// memchat - terminal client for memory-backed chat servers
///
/// Log in with a username, chat with the server and replay the stored
/// conversation.
#[derive(Parser, Debug, Clone)]
#[command(name = "memchat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, default_value = "config/memchat.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Override the chat server base URL
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for memchat
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat session
    Chat {
        /// Username submitted as the first login attempt
        #[arg(short, long)]
        username: Option<String>,
    },

    /// Log in and print the stored conversation
    History {
        /// Username to log in with
        #[arg(short, long)]
        username: Option<String>,

        /// Print the conversation as JSON
        #[arg(long)]
        json: bool,
    },

    /// Log in, send a single message and print the reply
    Send {
        /// Username to log in with
        #[arg(short, long)]
        username: Option<String>,

        /// Message text
        message: String,
    },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Username given on the command line, whatever the subcommand
    pub fn username(&self) -> Option<&str> {
        match &self.command {
            Commands::Chat { username }
            | Commands::History { username, .. }
            | Commands::Send { username, .. } => username.as_deref(),
        }
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/memchat.yaml".to_string()),
            verbose: false,
            server: None,
            command: Commands::Chat { username: None },
        }
    }
}
