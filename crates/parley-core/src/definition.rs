use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::{CoreError, CoreResult};
use crate::grid::{Bounds, Point};
use crate::world::WorldState;

/// The built-in village, used when no world file is given.
pub const DEFAULT_WORLD: &str = include_str!("../worlds/village.json");

/// A world as written in a JSON world file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldDefinition {
    /// Display name of the world.
    pub name: String,
    /// Play area width in cells.
    pub width: u16,
    /// Play area height in cells.
    pub height: u16,
    /// Where the player starts.
    pub player: Point,
    /// Characters placed in the world.
    #[serde(default)]
    pub entities: Vec<EntityDefinition>,
}

/// One character in a world file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDefinition {
    /// Display name.
    pub name: String,
    /// Seed text describing the character and situation.
    pub persona: String,
    /// Glyph drawn on the play area (defaults to the first letter of the name).
    #[serde(default)]
    pub glyph: Option<char>,
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl WorldDefinition {
    /// Parse a world definition from JSON text.
    pub fn from_json(text: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a world file.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// The built-in village.
    pub fn builtin() -> CoreResult<Self> {
        Self::from_json(DEFAULT_WORLD)
    }

    /// Validate the definition and build the world state from it.
    pub fn build(&self) -> CoreResult<WorldState> {
        if self.width == 0 || self.height == 0 {
            return Err(CoreError::Validation(format!(
                "play area must not be empty (got {}x{})",
                self.width, self.height
            )));
        }

        let bounds = Bounds::new(self.width, self.height);
        if !bounds.contains(self.player) {
            return Err(CoreError::OutOfBounds {
                name: "player".to_string(),
                position: self.player,
                width: self.width,
                height: self.height,
            });
        }

        let mut world = WorldState::new(&self.name, bounds, self.player);
        for def in &self.entities {
            let name = def.name.trim();
            if name.is_empty() {
                return Err(CoreError::Validation("entity name must not be empty".into()));
            }
            let persona = dedent(&def.persona);
            if persona.is_empty() {
                return Err(CoreError::Validation(format!(
                    "entity \"{name}\" has an empty persona"
                )));
            }

            let mut entity = Entity::new(name, persona, Point::new(def.x, def.y));
            if let Some(glyph) = def.glyph {
                entity = entity.with_glyph(glyph);
            }
            world.add_entity(entity)?;
        }

        Ok(world)
    }
}

/// Trim every line and drop blank lines at either end.
fn dedent(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
