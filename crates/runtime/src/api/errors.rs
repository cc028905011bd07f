//! Unified error types surfaced by the runtime API.
//!
//! Executor failures never surface here: they become history records. These
//! errors cover direct façade calls such as catalog lookups and persistence.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("unknown action `{0}`")]
    UnknownAction(String),

    #[error("runtime requires an initial game state before building")]
    MissingState,

    #[error("failed to encode world data")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode world data")]
    Decode(#[source] serde_json::Error),
}
