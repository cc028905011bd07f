//! Rules of the canonical actions.
//!
//! Each kind validates against `&GameState` and commits against
//! `&mut GameState`. Commits only mutate once every fallible check has
//! passed, so a rejected commit leaves the state untouched.

mod build;
mod communication;
mod interact;
mod movement;

pub use build::{Build, BuildPlan, build_requirements, required_terrain};
pub use communication::Speak;
pub use interact::{Collect, CollectPlan, DoorToggle, Push, PushPlan};
pub use movement::{MoveForward, Step, Turn, TurnSide};

use super::ValidationError;
use crate::state::{GameState, Position};

/// Checks that `position` can be entered: in bounds, passable terrain, and no
/// movement-blocking object on it.
pub fn ensure_available(state: &GameState, position: Position) -> Result<(), ValidationError> {
    let terrain = state
        .map
        .terrain(position)
        .ok_or(ValidationError::OutOfBounds { position })?;
    if !terrain.is_passable() {
        return Err(ValidationError::Impassable { position, terrain });
    }
    if let Some(object) = state
        .world
        .object_at(position)
        .filter(|object| object.blocks_movement())
    {
        return Err(ValidationError::Occupied {
            position,
            object: object.id.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::config::GameConfig;
    use crate::state::{
        Direction, GameState, MapDimensions, PlayerState, Position, TerrainKind, TileMap,
    };

    /// Floor room of `width`x`height` with the player at the origin facing right.
    pub fn room(width: u32, height: u32) -> GameState {
        GameState::new(
            TileMap::filled(MapDimensions::new(width, height), TerrainKind::Floor),
            PlayerState::new(Position::ORIGIN, Direction::Right),
            Position::new(width as i32 - 1, 0),
            GameConfig::default(),
        )
    }
}
