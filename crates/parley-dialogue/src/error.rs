//! Error types for the dialogue engine.

use thiserror::Error;

/// Result type for dialogue operations.
pub type DialogueResult<T> = Result<T, DialogueError>;

/// Errors a conversation can report. None of them end the game.
#[derive(Debug, Error)]
pub enum DialogueError {
    /// A reply is already being generated for this entity.
    #[error("{0} is still thinking")]
    Busy(String),

    /// The generation service failed.
    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),

    /// The selected label is not in the current option set.
    #[error("no such option: {0}")]
    OptionNotFound(u8),
}

/// Failure reported by a text-generation backend.
///
/// The engine only distinguishes success from failure; the message is shown
/// to the player and logged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// The request could not be completed.
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// The service answered with something that is not a completion.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
