//! Error types for the completion client.

use parley_dialogue::GenerationError;
use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors from configuring or calling the completion service.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No API key was configured.
    #[error("OPENAI_API_KEY is not set (export it or put it in a .env file)")]
    MissingApiKey,

    /// The HTTP client could not be created.
    #[error("could not create HTTP client: {0}")]
    Setup(String),

    /// The request failed or the service answered with an error status.
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// The service answered with something that is not a completion.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl From<ClientError> for GenerationError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::InvalidResponse(msg) => GenerationError::InvalidResponse(msg),
            ClientError::RequestFailed(msg) => GenerationError::RequestFailed(msg),
            other => GenerationError::RequestFailed(other.to_string()),
        }
    }
}
