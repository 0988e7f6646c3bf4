//! Transcript model
//!
//! A [`Transcript`] is the ordered list of messages currently shown to the
//! user. Messages have no identity beyond their position: the same text may
//! appear any number of times.

use colored::{ColoredString, Colorize};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who a message came from
///
/// The server speaks `"user"` and `"bot"`. Any other sender string is kept
/// as-is so history from newer servers still renders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Sender {
    /// The person at the keyboard
    User,
    /// The chat server's reply
    Bot,
    /// Unrecognised sender tag, rendered verbatim
    Other(String),
}

impl Sender {
    /// Wire name of this sender
    pub fn as_str(&self) -> &str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
            Self::Other(name) => name.as_str(),
        }
    }

    /// Short label shown in front of each rendered line
    pub fn label(&self) -> &str {
        match self {
            Self::User => "you",
            Self::Bot => "bot",
            Self::Other(name) => name.as_str(),
        }
    }

    /// Colored `[label]` tag used by the terminal renderer
    pub fn colored_tag(&self) -> String {
        let label: ColoredString = match self {
            Self::User => self.label().cyan().bold(),
            Self::Bot => self.label().green().bold(),
            Self::Other(_) => self.label().yellow(),
        };
        format!("[{}]", label)
    }
}

impl From<String> for Sender {
    fn from(value: String) -> Self {
        match value.as_str() {
            "user" => Self::User,
            "bot" => Self::Bot,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for Sender {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<Sender> for String {
    fn from(value: Sender) -> Self {
        match value {
            Sender::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single rendered chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who sent it
    pub sender: Sender,
    /// Message body, displayed as plain text
    pub text: String,
}

impl Message {
    /// Create a message from an arbitrary sender
    pub fn new(sender: impl Into<Sender>, text: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            text: text.into(),
        }
    }

    /// Create a user-tagged message
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    /// Create a bot-tagged message
    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(Sender::Bot, text)
    }
}

/// Ordered list of messages in display order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Create an empty transcript
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message at the end
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Remove every message
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Messages in display order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True when nothing has been rendered
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
