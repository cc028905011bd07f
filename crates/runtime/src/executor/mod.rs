//! Sequential action executor.
//!
//! Actions are queued by name and drained strictly in FIFO order: each action
//! runs to completion, including any presentation it awaits, before the next
//! one is dequeued. A single-flight flag turns overlapping drain requests into
//! no-ops, and every outcome is appended to the history.
//!
//! Per action: `queued → validating → (rejected | executing → (succeeded | failed))`.
//! Failures never abort the drain; they become records with a
//! [`FailureReason`] plus a message through the presenter.

mod feedback;
mod record;

pub use feedback::{refusal_message, validation_message};
pub use record::{ActionRecord, FailureReason};

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};

use puzzle_core::{
    ActionParams, GameError, GameState, Snapshot, StateCheckpoint, TestReport, TestSuite, evaluate,
};
use serde::Serialize;
use tokio::sync::{Mutex, broadcast};
use tracing::{debug, error, info, warn};

use crate::api::{GameEvent, Presenter};
use crate::catalog::{ActionCatalog, ActionContext, ActionOutcome};
use record::History;

/// Executor switches taken from the runtime configuration.
#[derive(Clone, Copy, Debug)]
pub struct ExecutorOptions {
    pub record_checkpoints: bool,
    pub run_win_check: bool,
}

impl Default for ExecutorOptions {
    fn default() -> Self {
        Self {
            record_checkpoints: true,
            run_win_check: true,
        }
    }
}

/// Totals of one queue drain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DrainSummary {
    pub executed: usize,
    pub failed: usize,
}

#[derive(Debug)]
struct QueuedAction {
    name: String,
    params: ActionParams,
}

/// Resets the single-flight flag when a drain ends, including on cancellation.
struct DrainGuard<'a>(&'a AtomicBool);

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct ActionExecutor {
    catalog: ActionCatalog,
    state: Arc<Mutex<GameState>>,
    presenter: Arc<dyn Presenter>,
    ctx: ActionContext,
    tests: TestSuite,
    options: ExecutorOptions,
    queue: StdMutex<VecDeque<QueuedAction>>,
    draining: AtomicBool,
    /// Serializes `execute` and `undo_last_action`.
    turn: Mutex<()>,
    history: StdMutex<History>,
    events: broadcast::Sender<GameEvent>,
}

impl ActionExecutor {
    pub fn new(
        catalog: ActionCatalog,
        state: Arc<Mutex<GameState>>,
        presenter: Arc<dyn Presenter>,
        tests: TestSuite,
        options: ExecutorOptions,
        events: broadcast::Sender<GameEvent>,
    ) -> Self {
        let ctx = ActionContext::new(Arc::clone(&state), Arc::clone(&presenter));
        Self {
            catalog,
            state,
            presenter,
            ctx,
            tests,
            options,
            queue: StdMutex::new(VecDeque::new()),
            draining: AtomicBool::new(false),
            turn: Mutex::new(()),
            history: StdMutex::new(History::default()),
            events,
        }
    }

    pub fn catalog(&self) -> &ActionCatalog {
        &self.catalog
    }

    pub fn state(&self) -> Arc<Mutex<GameState>> {
        Arc::clone(&self.state)
    }

    pub fn tests(&self) -> &TestSuite {
        &self.tests
    }

    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.events.subscribe()
    }

    // ===== queue =====

    /// Appends an action to the queue. Returns the queue length.
    pub fn queue_action(&self, name: impl Into<String>, params: ActionParams) -> usize {
        let name = name.into();
        let mut queue = self.lock_queue();
        debug!(target: "runtime::executor", action = %name, position = queue.len(), "queued action");
        queue.push_back(QueuedAction { name, params });
        queue.len()
    }

    pub fn queued(&self) -> usize {
        self.lock_queue().len()
    }

    pub fn is_draining(&self) -> bool {
        self.draining.load(Ordering::Acquire)
    }

    /// Drains the queue in FIFO order.
    ///
    /// Returns `None` without doing anything when another drain is already in
    /// progress; that drain will pick up everything queued meanwhile.
    pub async fn execute_queue(&self) -> Option<DrainSummary> {
        if self
            .draining
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!(target: "runtime::executor", "drain already in progress");
            return None;
        }
        let _guard = DrainGuard(&self.draining);

        let mut summary = DrainSummary::default();
        while let Some(next) = self.pop_queued() {
            debug!(target: "runtime::executor", action = %next.name, "dequeued action");
            let record = self.execute(&next.name, next.params).await;
            summary.executed += 1;
            if !record.success {
                summary.failed += 1;
            }
        }
        Some(summary)
    }

    // ===== execution =====

    /// Runs one action immediately and records the outcome.
    pub async fn execute(&self, name: &str, params: ActionParams) -> ActionRecord {
        let _turn = self.turn.lock().await;

        let Some(action) = self.catalog.get(name).cloned() else {
            error!(target: "runtime::executor", action = %name, "unknown action");
            let message = feedback::unknown_action_message(name);
            self.presenter.show_message(&message).await;
            return self.record(
                ActionRecord::failed(name, &params, FailureReason::UnknownAction, message),
                None,
            );
        };

        // Validation and checkpoint share one lock so nothing changes between them.
        let validated = {
            let state = self.state.lock().await;
            action.validate(&state, &params).map(|()| {
                self.options
                    .record_checkpoints
                    .then(|| state.checkpoint())
            })
        };
        let checkpoint = match validated {
            Ok(checkpoint) => checkpoint,
            Err(err) => {
                warn!(
                    target: "runtime::executor",
                    action = %name,
                    code = err.error_code(),
                    severity = err.severity().as_str(),
                    "validation failed: {err}"
                );
                let (reason, message) = if err.is_locked_resource() {
                    (FailureReason::LockedResource, refusal_message(&err))
                } else {
                    (FailureReason::ValidationFailed, validation_message(name))
                };
                self.presenter.show_message(&message).await;
                return self.record(
                    ActionRecord::failed(name, &params, reason, err.to_string()),
                    None,
                );
            }
        };

        match action.execute(&self.ctx, &params).await {
            Ok(ActionOutcome::Completed(result)) => {
                debug!(target: "runtime::executor", action = %name, ?result, "action succeeded");
                let record = ActionRecord::succeeded(name, &params, result);
                self.after_success().await;
                self.record(record, checkpoint)
            }
            Ok(ActionOutcome::Refused(err)) => {
                warn!(target: "runtime::executor", action = %name, code = err.error_code(), "action refused: {err}");
                let reason = if err.is_locked_resource() {
                    FailureReason::LockedResource
                } else {
                    FailureReason::ValidationFailed
                };
                self.presenter.show_message(&refusal_message(&err)).await;
                self.record(
                    ActionRecord::failed(name, &params, reason, err.to_string()),
                    None,
                )
            }
            Err(err) => {
                error!(target: "runtime::executor", action = %name, %err, "action failed");
                let text = err.to_string();
                self.presenter
                    .show_message(&feedback::execution_error_message(&text))
                    .await;
                self.record(
                    ActionRecord::failed(name, &params, FailureReason::ExecutionError, text),
                    None,
                )
            }
        }
    }

    /// Trigger evaluation followed by the win check.
    async fn after_success(&self) {
        let mut state = self.state.lock().await;

        let report = state.world.check_triggers();
        if report.saturated {
            warn!(
                target: "runtime::executor",
                passes = report.passes,
                fired = report.fired,
                "trigger re-check limit reached"
            );
        } else if report.fired > 0 {
            debug!(target: "runtime::executor", fired = report.fired, passes = report.passes, "triggers fired");
        }

        if !self.options.run_win_check || state.level_completed {
            return;
        }
        let report = evaluate(&self.tests, &Snapshot::capture(&state));
        if report.passed {
            state.level_completed = true;
            info!(target: "runtime::executor", "level completed");
            let _ = self.events.send(GameEvent::LevelCompleted { report });
        }
    }

    fn record(&self, record: ActionRecord, checkpoint: Option<StateCheckpoint>) -> ActionRecord {
        self.lock_history().push(record.clone(), checkpoint);
        let _ = self.events.send(GameEvent::ActionRecorded {
            record: record.clone(),
        });
        record
    }

    // ===== history =====

    pub fn history(&self) -> Vec<ActionRecord> {
        self.lock_history().records()
    }

    pub fn history_len(&self) -> usize {
        self.lock_history().len()
    }

    /// Pops the last history entry and restores the state captured before it.
    ///
    /// Failed actions carry no checkpoint; undoing them only drops the record.
    /// `once` triggers that fired after the checkpoint are re-armed.
    pub async fn undo_last_action(&self) -> Option<ActionRecord> {
        let _turn = self.turn.lock().await;

        let popped = self.lock_history().pop();
        let Some((record, checkpoint)) = popped else {
            self.presenter.show_message(feedback::NOTHING_TO_UNDO).await;
            return None;
        };

        let restored = checkpoint.is_some();
        if let Some(checkpoint) = checkpoint {
            self.state.lock().await.restore(checkpoint);
        }
        info!(target: "runtime::executor", action = %record.name, restored, "undo applied");
        self.presenter
            .show_message(&feedback::undo_message(&record.name))
            .await;
        let _ = self.events.send(GameEvent::UndoApplied {
            record: record.clone(),
            restored,
        });
        Some(record)
    }

    /// Clears the queue, the single-flight flag and the history.
    pub fn reset(&self) {
        self.lock_queue().clear();
        self.draining.store(false, Ordering::Release);
        self.lock_history().clear();
        debug!(target: "runtime::executor", "executor reset");
    }

    // ===== evaluation =====

    pub async fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&*self.state.lock().await)
    }

    pub async fn evaluate(&self) -> TestReport {
        evaluate(&self.tests, &self.snapshot().await)
    }

    fn pop_queued(&self) -> Option<QueuedAction> {
        self.lock_queue().pop_front()
    }

    fn lock_queue(&self) -> MutexGuard<'_, VecDeque<QueuedAction>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_history(&self) -> MutexGuard<'_, History> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
