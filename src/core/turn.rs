//! Conversation turns.
//!
//! A turn is one role-tagged message: a system instruction, a user input,
//! or an assistant reply. Turns are immutable once created.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The author of a turn.
///
/// Serialized in lowercase, matching the `role` field expected by
/// chat-completion endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Standing instruction for the model.
    System,
    /// Text typed by the user.
    User,
    /// Reply produced by the model.
    Assistant,
}

impl Role {
    /// Returns the wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One role-tagged message in a conversation.
///
/// # Examples
///
/// ```
/// use chatline::core::{Role, Turn};
///
/// let turn = Turn::user("hello");
/// assert_eq!(turn.role(), Role::User);
/// assert_eq!(turn.content(), "hello");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    role: Role,
    content: String,
}

impl Turn {
    /// Creates a turn with the given role and content.
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Creates a system turn.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Creates a user turn.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Creates an assistant turn.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Returns the role of this turn.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the text of this turn.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}
