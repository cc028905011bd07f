//! Runtime orchestration for grid puzzle levels.
//!
//! This crate wires the deterministic rules of `puzzle-core` into an async,
//! strictly sequential action pipeline. Consumers embed [`Runtime`] to queue
//! named actions, drain them in order, undo, subscribe to events, and check
//! the level's goal tests.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the façade and builder
//! - [`api`] exposes the error type, event payloads and the presenter port
//! - [`catalog`] registers named actions and their implementations
//! - [`executor`] queues, runs and records actions
pub mod api;
pub mod catalog;
pub mod executor;
pub mod runtime;

pub use api::{
    AnimationKind, GameEvent, NullPresenter, ParticleKind, Presenter, Result, RuntimeError,
    SoundCue,
};
pub use catalog::{ActionCatalog, ActionContext, ActionError, ActionOutcome, GameAction};
pub use executor::{
    ActionExecutor, ActionRecord, DrainSummary, ExecutorOptions, FailureReason,
};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
