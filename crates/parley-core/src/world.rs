use std::collections::HashMap;

use crate::entity::{Entity, EntityId, Player};
use crate::error::{CoreError, CoreResult};
use crate::grid::{Bounds, Direction, Point};

/// Player and entity positions on a bounded play area.
///
/// Entities keep their insertion order so that drawing and proximity ties
/// resolve the same way every run.
#[derive(Debug, Clone)]
pub struct WorldState {
    /// Display name of the world.
    pub name: String,
    bounds: Bounds,
    player: Player,
    entities: Vec<Entity>,
    by_id: HashMap<EntityId, usize>,
    by_name_lower: HashMap<String, EntityId>,
}

impl WorldState {
    /// Create an empty world with the player at `start` (clamped into bounds).
    pub fn new(name: impl Into<String>, bounds: Bounds, start: Point) -> Self {
        Self {
            name: name.into(),
            bounds,
            player: Player::at(bounds.clamp(start)),
            entities: Vec::new(),
            by_id: HashMap::new(),
            by_name_lower: HashMap::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Entities
    // -----------------------------------------------------------------------

    /// Add an entity to the world. Returns the entity's ID.
    pub fn add_entity(&mut self, entity: Entity) -> CoreResult<EntityId> {
        let name_lower = entity.name.to_lowercase();
        if self.by_name_lower.contains_key(&name_lower) {
            return Err(CoreError::DuplicateName(entity.name.clone()));
        }
        if !self.bounds.contains(entity.position) {
            return Err(CoreError::OutOfBounds {
                name: entity.name.clone(),
                position: entity.position,
                width: self.bounds.width,
                height: self.bounds.height,
            });
        }

        let id = entity.id;
        self.by_name_lower.insert(name_lower, id);
        self.by_id.insert(id, self.entities.len());
        self.entities.push(entity);
        Ok(id)
    }

    /// Get a reference to an entity by ID.
    pub fn get_entity(&self, id: EntityId) -> Option<&Entity> {
        self.by_id.get(&id).map(|&idx| &self.entities[idx])
    }

    /// Find an entity by name (case-insensitive).
    pub fn find_by_name(&self, name: &str) -> Option<&Entity> {
        self.by_name_lower
            .get(&name.to_lowercase())
            .and_then(|id| self.get_entity(*id))
    }

    /// Iterate over all entities in insertion order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Number of entities in the world.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    // -----------------------------------------------------------------------
    // Player
    // -----------------------------------------------------------------------

    /// The play area.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// The player avatar.
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Mutable access to the player avatar.
    ///
    /// Position changes should go through [`WorldState::move_player`] so the
    /// bounds invariant holds.
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// Move the player and return the new position, clamped to the play area.
    pub fn move_player(&mut self, direction: Direction, steps: u16) -> Point {
        let target = self.player.position.shifted(direction, i32::from(steps));
        self.player.position = self.bounds.clamp(target);
        self.player.position
    }

    // -----------------------------------------------------------------------
    // Proximity
    // -----------------------------------------------------------------------

    /// Return `true` if the entity is within `radius` cells of the player.
    pub fn is_near(&self, id: EntityId, radius: u16) -> bool {
        self.get_entity(id)
            .is_some_and(|e| e.position.distance(self.player.position) <= i32::from(radius))
    }

    /// Entities within `radius` cells of the player, closest first.
    pub fn entities_near_player(&self, radius: u16) -> Vec<&Entity> {
        let origin = self.player.position;
        let mut near: Vec<&Entity> = self
            .entities
            .iter()
            .filter(|e| e.position.distance(origin) <= i32::from(radius))
            .collect();
        near.sort_by_key(|e| e.position.distance(origin));
        near
    }

    /// The closest entity within `radius` cells of the player, if any.
    pub fn nearest_entity(&self, radius: u16) -> Option<&Entity> {
        self.entities_near_player(radius).into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_world() -> WorldState {
        let mut world = WorldState::new("Test", Bounds::new(20, 10), Point::new(5, 5));
        world
            .add_entity(Entity::new("Hendry", "A dog.", Point::new(6, 6)))
            .unwrap();
        world
            .add_entity(Entity::new("Gembo", "A smooth talker.", Point::new(15, 2)))
            .unwrap();
        world
    }

    #[test]
    fn add_and_find_entities() {
        let world = test_world();
        assert_eq!(world.entity_count(), 2);
        let hendry = world.find_by_name("hendry").unwrap();
        assert_eq!(world.get_entity(hendry.id).unwrap().name, "Hendry");
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut world = test_world();
        let err = world
            .add_entity(Entity::new("HENDRY", "Another dog.", Point::new(1, 1)))
            .unwrap_err();
        assert!(matches!(err, CoreError::DuplicateName(_)));
    }

    #[test]
    fn entity_outside_bounds_rejected() {
        let mut world = test_world();
        let err = world
            .add_entity(Entity::new("Ghost", "Lost.", Point::new(20, 0)))
            .unwrap_err();
        assert!(matches!(err, CoreError::OutOfBounds { .. }));
    }

    #[test]
    fn start_position_is_clamped() {
        let world = WorldState::new("Test", Bounds::new(4, 4), Point::new(10, -2));
        assert_eq!(world.player().position, Point::new(3, 0));
    }

    #[test]
    fn move_player_stops_at_edges() {
        let mut world = test_world();
        assert_eq!(world.move_player(Direction::Left, 5), Point::new(0, 5));
        assert_eq!(world.move_player(Direction::Left, 1), Point::new(0, 5));
        assert_eq!(world.move_player(Direction::Down, 50), Point::new(0, 9));
        assert_eq!(world.move_player(Direction::Right, 1), Point::new(1, 9));
    }

    #[test]
    fn proximity_finds_nearest() {
        let mut world = test_world();
        let hendry = world.find_by_name("Hendry").unwrap().id;
        let gembo = world.find_by_name("Gembo").unwrap().id;

        assert!(world.is_near(hendry, 1));
        assert!(!world.is_near(gembo, 1));
        assert_eq!(world.nearest_entity(1).map(|e| e.id), Some(hendry));

        world.move_player(Direction::Left, 5);
        assert!(world.nearest_entity(1).is_none());
        assert_eq!(world.entities_near_player(20).len(), 2);
    }

    fn direction() -> impl Strategy<Value = Direction> {
        prop::sample::select(Direction::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn player_never_leaves_bounds(
            width in 1u16..40,
            height in 1u16..40,
            moves in prop::collection::vec((direction(), 0u16..60), 0..80),
        ) {
            let bounds = Bounds::new(width, height);
            let mut world = WorldState::new("Prop", bounds, Point::new(0, 0));
            for (dir, steps) in moves {
                let pos = world.move_player(dir, steps);
                prop_assert!(bounds.contains(pos));
            }
        }
    }
}
