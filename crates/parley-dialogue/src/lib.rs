//! Dialogue interaction engine for Parley.
//!
//! Builds prompts from an entity's persona and the last exchange, runs
//! generation requests as background tasks, parses replies into an utterance
//! plus numbered options, keeps per-entity conversation state, and routes
//! player input through the interaction controller.

pub mod config;
pub mod controller;
pub mod convention;
pub mod dispatch;
pub mod error;
pub mod generator;
pub mod options;
pub mod parser;
pub mod prompt;
pub mod session;
pub mod transcript;

#[cfg(test)]
mod testing;

pub use config::DialogueConfig;
pub use controller::{Flow, Input, InteractionController, InteractionState};
pub use convention::Convention;
pub use dispatch::{Completion, Dispatcher, RequestId};
pub use error::{DialogueError, DialogueResult, GenerationError};
pub use generator::{DisplaySink, Generator, Message, Role};
pub use options::{DialogueOption, OptionSet};
pub use parser::{Degradation, MarkerParser, ParsedResponse, ResponseParser};
pub use prompt::{PromptBuilder, PromptRequest};
pub use session::ConversationSession;
pub use transcript::{Speaker, Transcript, Turn};
