//! In-memory record of one conversation.

use std::fmt;

use chrono::{DateTime, Utc};

/// Who produced a transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    /// The player.
    Player,
    /// The entity being talked to.
    Entity,
    /// A failed generation.
    Failure,
}

/// A single transcript line.
#[derive(Debug, Clone)]
pub struct Turn {
    /// Who spoke.
    pub speaker: Speaker,
    /// What was said.
    pub text: String,
    /// When it was recorded.
    pub at: DateTime<Utc>,
}

/// Every turn of a conversation, oldest first. Lives as long as the session.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn stamped with the current time.
    pub fn record(&mut self, speaker: Speaker, text: impl Into<String>) {
        self.turns.push(Turn {
            speaker,
            text: text.into(),
            at: Utc::now(),
        });
    }

    /// All turns, oldest first.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Number of turns.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// `true` if nothing was said yet.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Render the transcript with `entity_name` standing in for the entity.
    pub fn render(&self, entity_name: &str) -> String {
        self.turns
            .iter()
            .map(|t| {
                let who = match t.speaker {
                    Speaker::Player => "You",
                    Speaker::Entity => entity_name,
                    Speaker::Failure => "(error)",
                };
                format!("[{}] {who}: {}", t.at.format("%H:%M:%S"), t.text)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player => write!(f, "player"),
            Self::Entity => write!(f, "entity"),
            Self::Failure => write!(f, "failure"),
        }
    }
}
