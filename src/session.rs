//! Session view state
//!
//! The client shows one of two views: the login prompt or the chat prompt.
//! The only transition is Login -> Chat, taken on the first successful
//! login. There is no way back.

use colored::Colorize;
use std::fmt;

/// Which view is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    /// Waiting for a username
    #[default]
    Login,
    /// Logged in; input lines are chat messages
    Chat,
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login => write!(f, "LOGIN"),
            Self::Chat => write!(f, "CHAT"),
        }
    }
}

impl ViewState {
    /// Get a colored tag representation of this view
    pub fn colored_tag(&self) -> String {
        match self {
            Self::Login => format!("[{}]", "LOGIN".yellow()),
            Self::Chat => format!("[{}]", "CHAT".green()),
        }
    }
}

/// Client-side session state
///
/// The server session itself lives in the HTTP cookie store. This only
/// tracks which view is active and who logged in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    view: ViewState,
    username: Option<String>,
}

impl Session {
    /// Create a session in the login view
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently active view
    pub fn view(&self) -> ViewState {
        self.view
    }

    /// Username of the last successful login
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Record a successful login
    ///
    /// Returns `true` when this call moved the session from the login view
    /// to the chat view, `false` when the chat view was already active.
    /// The username is updated either way.
    ///
    /// # Examples
    ///
    /// ```
    /// use memchat::session::{Session, ViewState};
    ///
    /// let mut session = Session::new();
    /// assert!(session.enter_chat("alice"));
    /// assert!(!session.enter_chat("alice"));
    /// assert_eq!(session.view(), ViewState::Chat);
    /// ```
    pub fn enter_chat(&mut self, username: &str) -> bool {
        self.username = Some(username.to_string());
        if self.view == ViewState::Chat {
            return false;
        }
        self.view = ViewState::Chat;
        true
    }

    /// Prompt matching the active view
    pub fn prompt(&self) -> String {
        match (self.view, &self.username) {
            (ViewState::Login, _) => format!("{} username> ", self.view.colored_tag()),
            (ViewState::Chat, Some(name)) => format!("{} {}> ", self.view.colored_tag(), name),
            (ViewState::Chat, None) => format!("{} you> ", self.view.colored_tag()),
        }
    }
}
