//! Canonical actions registered by [`super::ActionCatalog::with_defaults`].
//!
//! Each action plans against a read of the state, awaits its presentation,
//! then commits through the matching `puzzle_core` rule, which re-checks its
//! preconditions before mutating.
mod build;
mod interact;
mod movement;
mod speak;

pub use build::BuildAction;
pub use interact::{CollectAction, DoorAction, PushAction};
pub use movement::{MoveForwardAction, TurnAction};
pub use speak::SpeakAction;
