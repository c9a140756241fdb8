//! Base provider trait and conversation message type
//!
//! Defines the [`Provider`] trait implemented by completion backends and
//! the [`Message`] structure replayed to them each turn.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Message structure for conversation
///
/// Represents one message in the conversation sent to the completion
/// service. Messages are immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Role of the message sender (system, user, assistant)
    pub role: String,
    /// Content of the message
    pub content: String,
}

impl Message {
    /// Creates a new user message
    ///
    /// # Examples
    ///
    /// ```
    /// use meditrack::providers::Message;
    ///
    /// let msg = Message::user("I have a headache");
    /// assert_eq!(msg.role, "user");
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Creates a new assistant message
    ///
    /// # Examples
    ///
    /// ```
    /// use meditrack::providers::Message;
    ///
    /// let msg = Message::assistant("Drink plenty of water.");
    /// assert_eq!(msg.role, "assistant");
    /// ```
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }

    /// Creates a new system message
    ///
    /// # Examples
    ///
    /// ```
    /// use meditrack::providers::Message;
    ///
    /// let msg = Message::system("You are a diet assistant");
    /// assert_eq!(msg.role, "system");
    /// ```
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }
}

/// Provider trait for completion backends
///
/// A provider turns the conversation so far, plus a per-turn system prompt,
/// into one raw completion string. Implementations own their transport and
/// retry behavior; they never mutate the conversation, the caller decides
/// what to append.
///
/// # Examples
///
/// ```no_run
/// use meditrack::providers::{Message, Provider};
/// use meditrack::error::Result;
/// use async_trait::async_trait;
///
/// struct CannedProvider;
///
/// #[async_trait]
/// impl Provider for CannedProvider {
///     async fn complete(&self, _system_prompt: &str, _history: &[Message]) -> Result<String> {
///         Ok("canned response".to_string())
///     }
/// }
/// ```
#[async_trait]
pub trait Provider: Send + Sync {
    /// Completes the conversation and returns the raw completion text
    ///
    /// # Arguments
    ///
    /// * `system_prompt` - System prompt prepended to the outbound messages
    /// * `history` - Conversation history, replayed verbatim
    ///
    /// # Errors
    ///
    /// Returns [`crate::MeditrackError::RetriesExhausted`] once the attempt
    /// budget is spent; transient failures are consumed internally.
    async fn complete(&self, system_prompt: &str, history: &[Message]) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_user() {
        let msg = Message::user("Hello");
        assert_eq!(msg.role, "user");
        assert_eq!(msg.content, "Hello");
    }

    #[test]
    fn test_message_assistant() {
        let msg = Message::assistant("Hi there");
        assert_eq!(msg.role, "assistant");
        assert_eq!(msg.content, "Hi there");
    }

    #[test]
    fn test_message_system() {
        let msg = Message::system("System prompt");
        assert_eq!(msg.role, "system");
        assert_eq!(msg.content, "System prompt");
    }

    #[test]
    fn test_message_serialization() {
        let msg = Message::user("Test");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"role\":\"user\""));
        assert!(json.contains("\"content\":\"Test\""));
    }

    #[test]
    fn test_message_roundtrip() {
        let msg = Message::assistant("Answer");
        let json = serde_json::to_string(&msg).unwrap();
        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }
}
