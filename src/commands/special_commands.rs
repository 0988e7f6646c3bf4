//! Special commands parser for interactive chat mode
//!
//! Special commands are local to the client: they are never sent to the
//! server as chat text. They are prefixed with `/` and are
//! case-insensitive.
//!
//! Any other `/`-prefixed line is an ordinary chat message, because the
//! server has slash commands of its own (`/Store ...`, `/delete_memories`).

use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Command was given an argument it does not take
    #[error("{command} takes no arguments (got '{arg}')\n\nType '/help' to see valid usage")]
    UnexpectedArgument { command: String, arg: String },
}

/// Special commands that can be executed during interactive chat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Display help information
    Help,

    /// Show the active view, user and transcript size
    ShowStatus,

    /// Clear the transcript and replay the server's conversation
    ReloadHistory,

    /// List what the server remembers about the user
    ListMemories,

    /// Ask the server to forget everything about the user
    ForgetMemories,

    /// Exit the interactive session
    Exit,

    /// Not a special command
    ///
    /// The input should be sent to the server as a chat message.
    None,
}

const COMMANDS: &[(&str, SpecialCommand)] = &[
    ("/help", SpecialCommand::Help),
    ("/?", SpecialCommand::Help),
    ("/status", SpecialCommand::ShowStatus),
    ("/history", SpecialCommand::ReloadHistory),
    ("/memories", SpecialCommand::ListMemories),
    ("/forget", SpecialCommand::ForgetMemories),
    ("/exit", SpecialCommand::Exit),
    ("/quit", SpecialCommand::Exit),
];

/// Parse a line of chat input
///
/// # Errors
///
/// Returns [`CommandError::UnexpectedArgument`] when a known command is
/// followed by extra text.
///
/// # Examples
///
/// ```
/// use memchat::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// assert_eq!(parse_special_command("/HISTORY"), Ok(SpecialCommand::ReloadHistory));
/// assert_eq!(parse_special_command("/Store my name is Ann"), Ok(SpecialCommand::None));
/// assert_eq!(parse_special_command("hello"), Ok(SpecialCommand::None));
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return Ok(SpecialCommand::None);
    }

    let lower = trimmed.to_lowercase();
    let (head, rest) = match lower.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (lower.as_str(), ""),
    };

    match COMMANDS.iter().find(|(name, _)| *name == head) {
        Some((_, command)) if rest.is_empty() => Ok(*command),
        Some((name, _)) => Err(CommandError::UnexpectedArgument {
            command: name.to_string(),
            arg: rest.to_string(),
        }),
        None => Ok(SpecialCommand::None),
    }
}

/// Print the help text for special commands
pub fn print_help() {
    println!(
        r#"
Special Commands for Interactive Chat Mode
==========================================

CONVERSATION:
  /history        - Replay the stored conversation
  /status         - Show the logged-in user and transcript size

MEMORIES:
  /memories       - List what the server remembers about you
  /forget         - Ask the server to forget everything about you

SESSION:
  /help           - Show this help message
  /?              - Same as /help
  /exit           - Exit interactive mode (waits for pending replies)
  /quit           - Same as /exit

Anything else, including other /commands, is sent to the server as a
message.
"#
    );
}
