use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::grid::Point;

/// Unique identifier for every entity in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    /// Generate a new random entity ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// A non-player character the player can walk up to and talk with.
///
/// The persona is fixed at construction: there is no setter, and every
/// prompt about this entity is primed with the same text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    /// Unique identifier for this entity.
    pub id: EntityId,
    /// Display name of the entity.
    pub name: String,
    /// Character drawn on the play area.
    pub glyph: char,
    /// Current grid position.
    pub position: Point,
    persona: String,
}

impl Entity {
    /// Create a new entity with a random ID.
    pub fn new(name: impl Into<String>, persona: impl Into<String>, position: Point) -> Self {
        let name = name.into();
        let glyph = name.chars().next().unwrap_or('?');
        Self {
            id: EntityId::new(),
            name,
            glyph,
            position,
            persona: persona.into(),
        }
    }

    /// Set the glyph drawn for this entity.
    pub fn with_glyph(mut self, glyph: char) -> Self {
        self.glyph = glyph;
        self
    }

    /// The seed text describing this entity's character and situation.
    pub fn persona(&self) -> &str {
        &self.persona
    }
}

/// The player-controlled avatar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Current grid position.
    pub position: Point,
    /// Most recent line the player said (chosen option or typed text).
    pub last_input: Option<String>,
}

impl Player {
    /// Create a player standing at the given position.
    pub fn at(position: Point) -> Self {
        Self {
            position,
            last_input: None,
        }
    }

    /// Record what the player just said.
    pub fn say(&mut self, text: impl Into<String>) {
        self.last_input = Some(text.into());
    }
}
