//! Deterministic puzzle rules and data types shared across crates.
//!
//! `puzzle-core` defines the world model (tile map, objects, inventory,
//! variables, triggers), the rules of the canonical actions and the goal
//! evaluator. Everything here is synchronous and free of I/O; the runtime
//! crate layers presentation and sequencing on top.
pub mod action;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod state;

pub use action::{
    ActionCategory, ActionParams, ActionResult, ActionTransition, Build, Collect, DoorToggle,
    MoveForward, Push, Speak, Step, TransitionError, Turn, TurnSide, ValidationError,
    build_requirements,
};
pub use config::GameConfig;
pub use error::{ErrorSeverity, GameError};
pub use evaluation::{Snapshot, TestReport, TestResult, TestSpec, TestSuite, evaluate};
pub use state::{
    Collectible, DOOR_KIND, Direction, ElementState, GameState, Inventory, InventoryError,
    MapDimensions, MissionState, ObjectFlags, PlayerState, Position, SessionContext,
    StateCheckpoint, StateError, TerrainKind, TileMap, Trigger, TriggerId, TriggerReport,
    WorldData, WorldObject, WorldState,
};
