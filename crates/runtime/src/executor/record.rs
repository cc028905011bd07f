use chrono::{DateTime, Utc};
use puzzle_core::{ActionParams, ActionResult, StateCheckpoint};
use serde::{Deserialize, Serialize};

/// Why an action did not succeed.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::AsRefStr,
)]
pub enum FailureReason {
    /// Name not registered in the catalog.
    UnknownAction,
    /// Precondition check returned false.
    ValidationFailed,
    /// Gated resource (for example a door key) missing.
    LockedResource,
    /// The action body raised an error.
    ExecutionError,
}

/// One entry of the executor history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub name: String,
    pub params: ActionParams,
    pub timestamp: DateTime<Utc>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<FailureReason>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ActionResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActionRecord {
    pub fn succeeded(name: &str, params: &ActionParams, result: ActionResult) -> Self {
        Self {
            name: name.to_owned(),
            params: params.clone(),
            timestamp: Utc::now(),
            success: true,
            reason: None,
            result: Some(result),
            error: None,
        }
    }

    pub fn failed(
        name: &str,
        params: &ActionParams,
        reason: FailureReason,
        error: impl Into<String>,
    ) -> Self {
        Self {
            name: name.to_owned(),
            params: params.clone(),
            timestamp: Utc::now(),
            success: false,
            reason: Some(reason),
            result: None,
            error: Some(error.into()),
        }
    }
}

/// Append-only history with the checkpoint taken before each successful action.
#[derive(Debug, Default)]
pub(crate) struct History {
    entries: Vec<(ActionRecord, Option<StateCheckpoint>)>,
}

impl History {
    pub(crate) fn push(&mut self, record: ActionRecord, checkpoint: Option<StateCheckpoint>) {
        self.entries.push((record, checkpoint));
    }

    pub(crate) fn pop(&mut self) -> Option<(ActionRecord, Option<StateCheckpoint>)> {
        self.entries.pop()
    }

    pub(crate) fn records(&self) -> Vec<ActionRecord> {
        self.entries.iter().map(|(record, _)| record.clone()).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
