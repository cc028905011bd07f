#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use puzzle_core::{
    Direction, GameConfig, GameState, MapDimensions, PlayerState, Position, TerrainKind, TestSuite,
    TileMap,
};
use puzzle_runtime::{AnimationKind, Presenter, Runtime, SoundCue};
use tokio::sync::Notify;

/// Presenter that records everything it is asked to show.
///
/// When gated, `animate` signals `started` and then waits for `release`, which
/// lets a test hold an action mid-execution.
#[derive(Default)]
pub struct RecordingPresenter {
    pub messages: Mutex<Vec<String>>,
    pub speech: Mutex<Vec<String>>,
    pub animations: Mutex<Vec<(AnimationKind, Position, Position)>>,
    pub sounds: Mutex<Vec<SoundCue>>,
    gated: bool,
    pub started: Notify,
    pub release: Notify,
}

impl RecordingPresenter {
    pub fn gated() -> Self {
        Self {
            gated: true,
            ..Self::default()
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    pub fn animations(&self) -> Vec<AnimationKind> {
        self.animations
            .lock()
            .unwrap()
            .iter()
            .map(|(kind, _, _)| *kind)
            .collect()
    }
}

#[async_trait]
impl Presenter for RecordingPresenter {
    async fn animate(&self, kind: AnimationKind, from: Position, to: Position) {
        self.animations.lock().unwrap().push((kind, from, to));
        if self.gated {
            self.started.notify_one();
            self.release.notified().await;
        }
    }

    fn play_sound(&self, cue: SoundCue) {
        self.sounds.lock().unwrap().push(cue);
    }

    async fn show_message(&self, text: &str) {
        self.messages.lock().unwrap().push(text.to_owned());
    }

    async fn show_speech_bubble(&self, text: &str) {
        self.speech.lock().unwrap().push(text.to_owned());
    }
}

/// Floor room with the player at `player` facing right and the goal in the
/// bottom-right corner.
pub fn room(width: u32, height: u32, player: Position) -> GameState {
    GameState::new(
        TileMap::filled(MapDimensions::new(width, height), TerrainKind::Floor),
        PlayerState::new(player, Direction::Right),
        Position::new(width as i32 - 1, height as i32 - 1),
        GameConfig::default(),
    )
}

pub fn start(state: GameState, tests: TestSuite) -> (Runtime, Arc<RecordingPresenter>) {
    start_with(state, tests, RecordingPresenter::default())
}

pub fn start_with(
    state: GameState,
    tests: TestSuite,
    presenter: RecordingPresenter,
) -> (Runtime, Arc<RecordingPresenter>) {
    let presenter = Arc::new(presenter);
    let runtime = Runtime::builder()
        .initial_state(state)
        .tests(tests)
        .presenter_arc(presenter.clone())
        .build()
        .expect("runtime should build");
    (runtime, presenter)
}
