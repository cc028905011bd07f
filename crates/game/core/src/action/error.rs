//! Action rule errors.
//!
//! `ValidationError` covers every precondition a canonical action can reject;
//! `TransitionError` adds the store failures that can only surface while a
//! validated action is being committed.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{Position, StateError, TerrainKind};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{position} is outside the map")]
    OutOfBounds { position: Position },

    #[error("{terrain} at {position} is impassable")]
    Impassable {
        position: Position,
        terrain: TerrainKind,
    },

    #[error("{position} is occupied by `{object}`")]
    Occupied { position: Position, object: String },

    #[error("nothing pushable at {position}")]
    NothingToPush { position: Position },

    #[error("no door at {position}")]
    NoDoor { position: Position },

    #[error("door `{door}` is already open")]
    AlreadyOpen { door: String },

    #[error("door `{door}` is already closed")]
    AlreadyClosed { door: String },

    #[error("nothing to collect at {position}")]
    NothingToCollect { position: Position },

    #[error("missing `{0}` parameter")]
    MissingParameter(&'static str),

    #[error("`{kind}` cannot be built")]
    UnknownStructure { kind: String },

    #[error("`{kind}` must be built on {required} (found {found:?} at {position})")]
    WrongTerrain {
        kind: String,
        position: Position,
        required: TerrainKind,
        found: Option<TerrainKind>,
    },

    #[error("`{kind}` needs {required} {item}, have {available}")]
    InsufficientResources {
        kind: String,
        item: String,
        required: u32,
        available: u32,
    },

    #[error("door `{door}` needs key `{key}`")]
    MissingKey { door: String, key: String },

    #[error("door `{door}` is locked")]
    Locked { door: String },
}

impl ValidationError {
    /// Refusals caused by a gated resource rather than a failed precondition.
    pub fn is_locked_resource(&self) -> bool {
        matches!(
            self,
            ValidationError::MissingKey { .. } | ValidationError::Locked { .. }
        )
    }
}

impl GameError for ValidationError {
    fn severity(&self) -> ErrorSeverity {
        use ValidationError::*;
        match self {
            MissingParameter(_) | UnknownStructure { .. } => ErrorSeverity::Validation,
            _ => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        use ValidationError::*;
        match self {
            OutOfBounds { .. } => "VALIDATION_OUT_OF_BOUNDS",
            Impassable { .. } => "VALIDATION_IMPASSABLE",
            Occupied { .. } => "VALIDATION_OCCUPIED",
            NothingToPush { .. } => "VALIDATION_NOTHING_TO_PUSH",
            NoDoor { .. } => "VALIDATION_NO_DOOR",
            AlreadyOpen { .. } => "VALIDATION_ALREADY_OPEN",
            AlreadyClosed { .. } => "VALIDATION_ALREADY_CLOSED",
            NothingToCollect { .. } => "VALIDATION_NOTHING_TO_COLLECT",
            MissingParameter(_) => "VALIDATION_MISSING_PARAMETER",
            UnknownStructure { .. } => "VALIDATION_UNKNOWN_STRUCTURE",
            WrongTerrain { .. } => "VALIDATION_WRONG_TERRAIN",
            InsufficientResources { .. } => "VALIDATION_INSUFFICIENT_RESOURCES",
            MissingKey { .. } => "VALIDATION_MISSING_KEY",
            Locked { .. } => "VALIDATION_LOCKED",
        }
    }
}

/// Failure while committing an action.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error(transparent)]
    Rejected(#[from] ValidationError),

    #[error(transparent)]
    State(#[from] StateError),
}

impl GameError for TransitionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            TransitionError::Rejected(err) => err.severity(),
            TransitionError::State(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            TransitionError::Rejected(err) => err.error_code(),
            TransitionError::State(err) => err.error_code(),
        }
    }
}
