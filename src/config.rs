//! Configuration management for memchat
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{MemchatError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Main configuration structure for memchat
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Chat server connection settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Interactive session settings
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Chat server connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL the `/login`, `/chat` and `/get_conversation` paths hang off
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Optional per-request timeout in seconds
    ///
    /// Unset means requests wait as long as the server takes.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_user_agent() -> String {
    format!("memchat/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: None,
            user_agent: default_user_agent(),
        }
    }
}

/// Interactive session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Username submitted automatically when a session starts
    #[serde(default)]
    pub username: Option<String>,

    /// Print the welcome banner when the chat loop starts
    #[serde(default = "default_show_banner")]
    pub show_banner: bool,
}

fn default_show_banner() -> bool {
    true
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            username: None,
            show_banner: default_show_banner(),
        }
    }
}

impl Config {
    /// Load configuration from file, then apply env and CLI overrides
    ///
    /// A missing file is not an error: defaults are used and a warning is
    /// logged.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML configuration file
    /// * `cli` - Parsed command line, used for overrides
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(MemchatError::from)
            .with_context(|| format!("Failed to read config file {}", path))?;
        let config = serde_yaml::from_str(&contents)
            .map_err(MemchatError::from)
            .with_context(|| format!("Failed to parse config file {}", path))?;
        Ok(config)
    }

    fn apply_env_vars(&mut self) {
        if let Ok(base_url) = std::env::var("MEMCHAT_SERVER_URL") {
            self.server.base_url = base_url;
        }

        if let Ok(timeout) = std::env::var("MEMCHAT_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.server.timeout_seconds = Some(value);
            } else {
                tracing::warn!("Invalid MEMCHAT_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(user_agent) = std::env::var("MEMCHAT_USER_AGENT") {
            self.server.user_agent = user_agent;
        }

        if let Ok(username) = std::env::var("MEMCHAT_USERNAME") {
            self.chat.username = Some(username);
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        if let Some(server) = &cli.server {
            self.server.base_url = server.clone();
        }

        if let Some(username) = cli.username() {
            self.chat.username = Some(username.to_string());
        }
    }

    /// Parsed form of [`ServerConfig::base_url`]
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the URL does not parse
    pub fn base_url(&self) -> Result<Url> {
        Url::parse(&self.server.base_url).map_err(|e| {
            MemchatError::Config(format!(
                "Invalid server base_url '{}': {}",
                self.server.base_url, e
            ))
            .into()
        })
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error describing the first invalid field
    pub fn validate(&self) -> Result<()> {
        let url = self.base_url()?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(MemchatError::Config(format!(
                "server.base_url must use http or https, got '{}'",
                url.scheme()
            ))
            .into());
        }

        if self.server.timeout_seconds == Some(0) {
            return Err(MemchatError::Config(
                "server.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if let Some(username) = &self.chat.username {
            if username.trim().is_empty() {
                return Err(
                    MemchatError::Config("chat.username cannot be blank".to_string()).into(),
                );
            }
        }

        Ok(())
    }
}
