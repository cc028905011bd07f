//! Authoritative puzzle state.
//!
//! [`GameState`] combines the static tile map, the player, the level goal and
//! collectibles with the mutable [`WorldState`] store. Runtime layers hold it
//! behind a lock and mutate it through the action rules in [`crate::action`].
mod context;
mod error;
mod trigger;
mod world;

pub mod types;

pub use context::{ElementState, MissionState, SessionContext};
pub use error::{InventoryError, StateError};
pub use trigger::{Trigger, TriggerAction, TriggerCondition, TriggerId, TriggerReport};
pub use types::{
    DOOR_KIND, Direction, Inventory, MapDimensions, ObjectFlags, Position, Requirements,
    TerrainKind, TileMap, VisualState, WorldObject, is_traversable_structure,
};
pub use world::{WorldData, WorldState};

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub position: Position,
    pub facing: Direction,
}

impl PlayerState {
    pub fn new(position: Position, facing: Direction) -> Self {
        Self { position, facing }
    }

    /// Tile directly in front of the player.
    pub fn front(&self) -> Position {
        self.position.step(self.facing)
    }
}

/// Level-declared collectible tracked for the `collectibles` goal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collectible {
    pub position: Position,
    #[serde(rename = "type", default = "Collectible::default_kind")]
    pub kind: String,
    #[serde(default)]
    pub collected: bool,
}

impl Collectible {
    pub const DEFAULT_KIND: &'static str = "gem";

    pub fn new(position: Position, kind: impl Into<String>) -> Self {
        Self {
            position,
            kind: kind.into(),
            collected: false,
        }
    }

    fn default_kind() -> String {
        Self::DEFAULT_KIND.to_owned()
    }
}

/// Restorable copy of everything an action can change.
///
/// Triggers are closures and are not copied. The checkpoint lists the `once`
/// triggers already spent, so a restore re-arms those that fired later.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateCheckpoint {
    pub map: TileMap,
    pub player: PlayerState,
    pub world: WorldData,
    pub collectibles: Vec<Collectible>,
    pub level_completed: bool,
    #[serde(default)]
    pub spent_triggers: Vec<TriggerId>,
}

#[derive(Debug, Default)]
pub struct GameState {
    pub map: TileMap,
    pub player: PlayerState,
    pub goal: Position,
    pub world: WorldState,
    pub collectibles: Vec<Collectible>,
    pub context: SessionContext,
    pub level_completed: bool,
}

impl GameState {
    pub fn new(map: TileMap, player: PlayerState, goal: Position, config: GameConfig) -> Self {
        Self {
            map,
            player,
            goal,
            world: WorldState::new(config),
            collectibles: Vec::new(),
            context: SessionContext::default(),
            level_completed: false,
        }
    }

    /// In bounds, passable terrain, and not occupied by a blocking object.
    pub fn is_tile_available(&self, position: Position) -> bool {
        self.map.is_passable(position) && !self.world.is_blocked(position)
    }

    pub fn at_goal(&self) -> bool {
        self.player.position == self.goal
    }

    /// Flags the first uncollected level collectible at `position` of `kind`.
    pub fn mark_collected(&mut self, position: Position, kind: &str) -> bool {
        match self
            .collectibles
            .iter_mut()
            .find(|c| !c.collected && c.position == position && c.kind == kind)
        {
            Some(collectible) => {
                collectible.collected = true;
                true
            }
            None => false,
        }
    }

    pub fn checkpoint(&self) -> StateCheckpoint {
        StateCheckpoint {
            map: self.map.clone(),
            player: self.player,
            world: self.world.serialize(),
            collectibles: self.collectibles.clone(),
            level_completed: self.level_completed,
            spent_triggers: self.world.spent_trigger_ids(),
        }
    }

    pub fn restore(&mut self, checkpoint: StateCheckpoint) {
        self.map = checkpoint.map;
        self.player = checkpoint.player;
        self.world.deserialize(checkpoint.world);
        self.collectibles = checkpoint.collectibles;
        self.level_completed = checkpoint.level_completed;
        self.world.rearm_triggers(&checkpoint.spent_triggers);
    }
}
