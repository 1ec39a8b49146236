//! Request payload construction.
//!
//! Turns the buffered conversation plus the turns of a new request into
//! the JSON body of a chat-completion call.

use super::context::ContextBuffer;
use super::turn::Turn;
use serde::Serialize;

/// Body of a chat-completion request.
///
/// Serializes as `{"model": ..., "messages": [{"role": ..., "content": ...}]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    /// Model identifier understood by the endpoint.
    pub model: String,
    /// Conversation turns in chronological order.
    pub messages: Vec<Turn>,
}

impl ChatRequest {
    /// Serializes the request to a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Builds [`ChatRequest`] values. Pure: no I/O, no mutation of the buffer.
pub struct PayloadBuilder;

impl PayloadBuilder {
    /// Builds a request from the buffered history and a new exchange.
    ///
    /// The messages are the buffered turns in order, then the system
    /// instruction, then the new user text. Both new turns are always
    /// present regardless of how small the buffer's capacity is; whether
    /// they are recorded into the buffer is up to the caller.
    ///
    /// # Examples
    ///
    /// ```
    /// use chatline::core::{ContextBuffer, PayloadBuilder, Role};
    ///
    /// let buffer = ContextBuffer::new();
    /// let request = PayloadBuilder::build("gpt-3.5-turbo", "be brief", &buffer, "hi");
    /// assert_eq!(request.messages.len(), 2);
    /// assert_eq!(request.messages[0].role(), Role::System);
    /// assert_eq!(request.messages[1].role(), Role::User);
    /// ```
    #[must_use]
    pub fn build(
        model_id: &str,
        system_role_text: &str,
        context: &ContextBuffer,
        new_user_text: &str,
    ) -> ChatRequest {
        let mut messages = Vec::with_capacity(context.len() + 2);
        messages.extend(context.iter().cloned());
        messages.push(Turn::system(system_role_text));
        messages.push(Turn::user(new_user_text));

        ChatRequest {
            model: model_id.to_string(),
            messages,
        }
    }
}
