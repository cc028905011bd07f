//! Action catalog: named, registered actions with a pure precondition check
//! and an async execution routine.
//!
//! # Architecture
//!
//! - [`GameAction`] is the trait object stored in the catalog
//! - `validate` is synchronous and must not mutate; the executor calls it
//!   under the state lock
//! - `execute` may suspend on the [`Presenter`] and mutates through
//!   [`ActionContext`], which never holds the state lock across an await
//! - The canonical actions live in [`actions`] and wrap the rules from
//!   `puzzle_core::action`

pub mod actions;
mod registry;

pub use registry::ActionCatalog;

use std::sync::Arc;

use async_trait::async_trait;
use puzzle_core::{
    ActionCategory, ActionParams, ActionResult, GameState, TransitionError, ValidationError,
};
use tokio::sync::Mutex;

use crate::api::Presenter;

/// Failure raised while an action body runs. Recorded as an execution error.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error("{0}")]
    Failed(String),
}

impl From<ValidationError> for ActionError {
    fn from(err: ValidationError) -> Self {
        ActionError::Transition(err.into())
    }
}

/// How an execute call ended when it did not raise an error.
#[derive(Clone, Debug, PartialEq)]
pub enum ActionOutcome {
    Completed(ActionResult),
    /// Refused at execution time without touching the state (for example a
    /// door whose key is missing).
    Refused(ValidationError),
}

/// Handle given to executing actions.
#[derive(Clone)]
pub struct ActionContext {
    state: Arc<Mutex<GameState>>,
    presenter: Arc<dyn Presenter>,
}

impl ActionContext {
    pub fn new(state: Arc<Mutex<GameState>>, presenter: Arc<dyn Presenter>) -> Self {
        Self { state, presenter }
    }

    pub fn presenter(&self) -> &dyn Presenter {
        self.presenter.as_ref()
    }

    /// Runs `f` against the state under the lock.
    pub async fn read<R>(&self, f: impl FnOnce(&GameState) -> R) -> R {
        let state = self.state.lock().await;
        f(&state)
    }

    /// Runs `f` against the mutable state under the lock.
    pub async fn write<R>(&self, f: impl FnOnce(&mut GameState) -> R) -> R {
        let mut state = self.state.lock().await;
        f(&mut state)
    }
}

#[async_trait]
pub trait GameAction: Send + Sync {
    fn category(&self) -> ActionCategory;

    fn description(&self) -> &str;

    /// Pure precondition check. Must not mutate or suspend.
    fn validate(&self, state: &GameState, params: &ActionParams) -> Result<(), ValidationError>;

    async fn execute(
        &self,
        ctx: &ActionContext,
        params: &ActionParams,
    ) -> Result<ActionOutcome, ActionError>;
}
