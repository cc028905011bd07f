//! Plain data types composing the puzzle state.

mod common;
mod inventory;
mod map;
mod object;

pub use common::{Direction, Position};
pub use inventory::{Inventory, Requirements};
pub use map::{MapDimensions, TerrainKind, TileMap};
pub use object::{DOOR_KIND, ObjectFlags, VisualState, WorldObject, is_traversable_structure};
