//! Public API surface of the runtime: error type, event payloads and the
//! presentation port.
mod errors;
mod events;
mod presenter;

pub use errors::{Result, RuntimeError};
pub use events::GameEvent;
pub use presenter::{AnimationKind, NullPresenter, ParticleKind, Presenter, SoundCue};
