//! Terminal presenter: effects complete immediately and are written to the log,
//! messages and speech go to stdout.

use async_trait::async_trait;
use puzzle_core::Position;
use puzzle_runtime::{AnimationKind, ParticleKind, Presenter, SoundCue};
use tracing::debug;

#[derive(Clone, Copy, Debug, Default)]
pub struct LogPresenter {
    /// Suppress stdout output (JSON report mode).
    pub quiet: bool,
}

#[async_trait]
impl Presenter for LogPresenter {
    async fn animate(&self, kind: AnimationKind, from: Position, to: Position) {
        debug!(target: "cli::presenter", %kind, %from, %to, "animate");
    }

    fn emit_particles(&self, kind: ParticleKind, at: Position) {
        debug!(target: "cli::presenter", %kind, %at, "particles");
    }

    fn play_sound(&self, cue: SoundCue) {
        debug!(target: "cli::presenter", %cue, "sound");
    }

    async fn show_message(&self, text: &str) {
        if !self.quiet {
            println!("! {text}");
        }
    }

    async fn show_speech_bubble(&self, text: &str) {
        if !self.quiet {
            println!("> \"{text}\"");
        }
    }
}
