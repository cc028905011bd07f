//! Session data owned by the host rather than the puzzle rules.
//!
//! The host writes the submitted program text, mission-wide progress and
//! element states here; the evaluator reads them back through a snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Progress carried across the levels of a mission.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MissionState {
    #[serde(default)]
    pub inventory: BTreeMap<String, u32>,
    #[serde(default)]
    pub structures: BTreeMap<String, Value>,
}

/// Host-reported state of a map element, keyed by `"x,y"`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementState {
    #[serde(rename = "type")]
    pub kind: String,
}

impl ElementState {
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into() }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    /// Program text submitted by the learner.
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub mission: Option<MissionState>,
    #[serde(default)]
    pub element_states: BTreeMap<String, ElementState>,
}
