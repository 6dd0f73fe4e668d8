//! Chat-completion client for Parley.
//!
//! [`OpenAiClient`] implements the dialogue engine's
//! [`Generator`](parley_dialogue::Generator) port against any service that
//! speaks the OpenAI `/v1/chat/completions` protocol.

pub mod client;
pub mod config;
pub mod error;

pub use client::OpenAiClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
