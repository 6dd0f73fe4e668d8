//! The text-generation port and the display port.

use async_trait::async_trait;

use crate::error::GenerationError;

/// Who a prompt message speaks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Framing instructions, sent once per request.
    System,
    /// Persona, context, and turn content.
    User,
}

impl Role {
    /// The wire name used by chat-completion APIs.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
        }
    }
}

/// One message of a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Who the message speaks for.
    pub role: Role,
    /// Message body.
    pub text: String,
}

impl Message {
    /// A system message.
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            text: text.into(),
        }
    }

    /// A user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }
}

/// A text-generation service.
///
/// Implementations own transport, authentication, and timeouts. The engine
/// calls `complete` from a spawned task, never from the input loop.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a completion for the given messages.
    async fn complete(&self, messages: Vec<Message>) -> Result<String, GenerationError>;
}

/// Where the engine shows text to the player.
pub trait DisplaySink {
    /// Replace the currently shown text.
    fn show(&mut self, text: &str);
}
