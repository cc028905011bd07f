//! Action domain: rules of the canonical puzzle actions.
//!
//! Each action kind implements [`ActionTransition`]: a pure precondition check
//! against the current state followed by a commit that mutates it. The async
//! runtime wraps these rules with presentation (animations, messages) and
//! sequencing; the rules themselves never block or log.
//!
//! # Module Structure
//!
//! - `error`: `ValidationError` (rejected preconditions) and `TransitionError`
//! - `params`: loosely-typed parameters supplied by the command intake
//! - `types`: `ActionCategory` and `ActionResult`
//! - `kinds`: movement, interaction, construction and communication rules

pub mod error;
pub mod kinds;
pub mod params;
pub mod types;

pub use error::{TransitionError, ValidationError};
pub use kinds::{
    Build, BuildPlan, Collect, CollectPlan, DoorToggle, MoveForward, Push, PushPlan, Speak, Step,
    Turn, TurnSide, build_requirements, ensure_available, required_terrain,
};
pub use params::ActionParams;
pub use types::{ActionCategory, ActionResult};

use crate::state::GameState;

/// Defines how a concrete action validates and mutates the game state.
pub trait ActionTransition {
    type Result;

    /// Validates pre-conditions using the state **before** mutation.
    fn pre_validate(&self, _state: &GameState) -> Result<(), ValidationError> {
        Ok(())
    }

    /// Applies the action. Implementations re-check their preconditions and
    /// only mutate once every check has passed.
    fn apply(&self, state: &mut GameState) -> Result<Self::Result, TransitionError>;
}
