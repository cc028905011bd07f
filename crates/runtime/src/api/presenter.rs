//! Presentation port consumed by the actions and the executor.
//!
//! Runtime users plug in a [`Presenter`] to render animations, messages and
//! speech bubbles. Awaitable calls must resolve once the visual effect has
//! finished; the runtime awaits them before committing the corresponding state
//! change. Fire-and-forget cues (particles, sounds) return immediately.
use async_trait::async_trait;
use puzzle_core::Position;
use serde::{Deserialize, Serialize};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AnimationKind {
    Walk,
    Push,
    DoorOpen,
    DoorClose,
    Collect,
    Build,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ParticleKind {
    Construction,
    Collect,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SoundCue {
    Collect,
    Build,
    Door,
}

/// Rendering side of the game.
///
/// Every method has a no-op default so headless hosts only implement what
/// they render.
#[async_trait]
pub trait Presenter: Send + Sync {
    /// Plays an animation between two tiles and resolves when it completes.
    async fn animate(&self, _kind: AnimationKind, _from: Position, _to: Position) {}

    fn emit_particles(&self, _kind: ParticleKind, _at: Position) {}

    fn play_sound(&self, _cue: SoundCue) {}

    /// Shows a message and resolves once it is dismissed.
    async fn show_message(&self, _text: &str) {}

    /// Shows a speech bubble above the player and resolves once it is dismissed.
    async fn show_speech_bubble(&self, _text: &str) {}
}

/// Headless presenter: every effect completes immediately.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {}
