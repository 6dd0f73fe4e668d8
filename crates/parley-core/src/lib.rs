//! Core types for Parley: entities, the player, and the grid world state.
//!
//! This crate holds the substrate the dialogue engine queries: who is where
//! on a bounded play area, who is close enough to talk to, and the static
//! world definitions (names, glyphs, personas) loaded from JSON.

/// World files and the built-in default world.
pub mod definition;
/// Entity and player types.
pub mod entity;
/// Error types used throughout the crate.
pub mod error;
/// Points, directions, and play-area bounds.
pub mod grid;
/// Player and entity positions with movement and proximity queries.
pub mod world;

/// Re-export world definition types.
pub use definition::{EntityDefinition, WorldDefinition};
/// Re-export entity types.
pub use entity::{Entity, EntityId, Player};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export grid types.
pub use grid::{Bounds, Direction, Point};
/// Re-export the world state.
pub use world::WorldState;
