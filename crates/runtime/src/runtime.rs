//! High-level runtime façade.
//!
//! The runtime owns the shared game state, the action executor and the event
//! channel, and exposes a builder-based API for clients to queue actions,
//! drain them, undo, and evaluate the level's goal tests.

use std::env;
use std::sync::Arc;

use puzzle_core::{
    ActionParams, GameConfig, GameState, Snapshot, TestReport, TestSuite, WorldData,
};
use tokio::sync::{Mutex, broadcast};
use tracing::info;

use crate::api::{GameEvent, NullPresenter, Presenter, Result, RuntimeError};
use crate::catalog::{ActionCatalog, GameAction};
use crate::executor::{ActionExecutor, ActionRecord, DrainSummary, ExecutorOptions};

/// Runtime configuration shared across the façade and executor.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub game_config: GameConfig,
    pub event_buffer_size: usize,
    /// Capture a state checkpoint before each action so undo can restore it.
    pub record_checkpoints: bool,
    /// Evaluate the level tests after every successful action.
    pub run_win_check: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game_config: GameConfig::default(),
            event_buffer_size: 100,
            record_checkpoints: true,
            run_win_check: true,
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `PUZZLE_EVENT_BUFFER` - Event channel capacity (default: 100)
    /// - `PUZZLE_TRIGGER_PASS_LIMIT` - Trigger passes per evaluation (default: 8)
    /// - `PUZZLE_RECORD_CHECKPOINTS` - Keep undo checkpoints (default: true)
    /// - `PUZZLE_WIN_CHECK` - Check the goal after each action (default: true)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(capacity) = read_env::<usize>("PUZZLE_EVENT_BUFFER") {
            config.event_buffer_size = capacity.max(1);
        }
        if let Some(limit) = read_env::<u32>("PUZZLE_TRIGGER_PASS_LIMIT") {
            config.game_config.trigger_pass_limit = limit.max(1);
        }
        if let Some(enabled) = read_env_bool("PUZZLE_RECORD_CHECKPOINTS") {
            config.record_checkpoints = enabled;
        }
        if let Some(enabled) = read_env_bool("PUZZLE_WIN_CHECK") {
            config.run_win_check = enabled;
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    match env::var(key).ok()?.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Cloneable handle over one level session.
#[derive(Clone)]
pub struct Runtime {
    executor: Arc<ActionExecutor>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Appends an action to the queue without running it.
    pub fn queue(&self, name: impl Into<String>, params: ActionParams) -> usize {
        self.executor.queue_action(name, params)
    }

    /// Drains the queue. `None` when a drain is already in progress.
    pub async fn run_queue(&self) -> Option<DrainSummary> {
        self.executor.execute_queue().await
    }

    /// Runs one action immediately, bypassing the queue.
    pub async fn execute(&self, name: &str, params: ActionParams) -> ActionRecord {
        self.executor.execute(name, params).await
    }

    pub async fn undo(&self) -> Option<ActionRecord> {
        self.executor.undo_last_action().await
    }

    /// Clears the queue, the drain flag and the history. The state is kept.
    pub fn reset(&self) {
        self.executor.reset();
    }

    pub fn history(&self) -> Vec<ActionRecord> {
        self.executor.history()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<GameEvent> {
        self.executor.subscribe()
    }

    pub fn catalog(&self) -> &ActionCatalog {
        self.executor.catalog()
    }

    /// Looks up a registered action by name.
    pub fn action(&self, name: &str) -> Result<&Arc<dyn GameAction>> {
        self.executor
            .catalog()
            .get(name)
            .ok_or_else(|| RuntimeError::UnknownAction(name.to_owned()))
    }

    pub fn state(&self) -> Arc<Mutex<GameState>> {
        self.executor.state()
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.executor.snapshot().await
    }

    pub async fn evaluate(&self) -> TestReport {
        self.executor.evaluate().await
    }

    /// Serializes the world store (objects, inventory, variables) as JSON.
    pub async fn save_world(&self) -> Result<String> {
        let data = self.executor.state().lock().await.world.serialize();
        serde_json::to_string(&data).map_err(RuntimeError::Encode)
    }

    /// Replaces the world store from JSON produced by [`Runtime::save_world`].
    /// Registered triggers are kept.
    pub async fn load_world(&self, json: &str) -> Result<()> {
        let data: WorldData = serde_json::from_str(json).map_err(RuntimeError::Decode)?;
        self.executor.state().lock().await.world.deserialize(data);
        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    state: Option<GameState>,
    catalog: Option<ActionCatalog>,
    presenter: Option<Arc<dyn Presenter>>,
    tests: TestSuite,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            state: None,
            catalog: None,
            presenter: None,
            tests: TestSuite::default(),
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Provide initial game state (required)
    pub fn initial_state(mut self, state: GameState) -> Self {
        self.state = Some(state);
        self
    }

    /// Replace the action catalog. Defaults to [`ActionCatalog::with_defaults`].
    pub fn catalog(mut self, catalog: ActionCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Set the presentation port. Defaults to [`NullPresenter`].
    pub fn presenter(mut self, presenter: impl Presenter + 'static) -> Self {
        self.presenter = Some(Arc::new(presenter));
        self
    }

    pub fn presenter_arc(mut self, presenter: Arc<dyn Presenter>) -> Self {
        self.presenter = Some(presenter);
        self
    }

    /// Goal tests checked after each successful action.
    pub fn tests(mut self, tests: TestSuite) -> Self {
        self.tests = tests;
        self
    }

    /// Build the runtime
    pub fn build(self) -> Result<Runtime> {
        let mut state = self.state.ok_or(RuntimeError::MissingState)?;
        state.world.set_config(self.config.game_config.clone());

        let (event_tx, _event_rx) = broadcast::channel::<GameEvent>(self.config.event_buffer_size);
        let catalog = self.catalog.unwrap_or_else(ActionCatalog::with_defaults);
        let presenter = self
            .presenter
            .unwrap_or_else(|| Arc::new(NullPresenter) as Arc<dyn Presenter>);

        info!(
            target: "runtime",
            actions = catalog.len(),
            tests = self.tests.items.len(),
            "runtime ready"
        );

        let executor = ActionExecutor::new(
            catalog,
            Arc::new(Mutex::new(state)),
            presenter,
            self.tests,
            ExecutorOptions {
                record_checkpoints: self.config.record_checkpoints,
                run_win_check: self.config.run_win_check,
            },
            event_tx,
        );

        Ok(Runtime {
            executor: Arc::new(executor),
        })
    }
}
