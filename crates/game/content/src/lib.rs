//! Data-driven level content and loaders.
//!
//! This crate turns files on disk into values the runtime consumes:
//! - Levels (RON or JSON): terrain, player start, goal, objects,
//!   collectibles, starting inventory and the goal test suite
//! - Game configuration (TOML)
//!
//! All loaders use puzzle-core types directly with serde for deserialization.

pub mod loaders;

pub use loaders::{
    CollectibleSpec, ConfigLoader, ContentFactory, Level, LevelLoader, LevelSpec, LoadResult,
    ObjectSpec, PlayerSpec,
};
