//! State-level errors raised by world-store mutators.

use crate::error::{ErrorSeverity, GameError};

/// Inventory mutation failures.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InventoryError {
    #[error("need {required} {item}, have {available}")]
    Insufficient {
        item: String,
        required: u32,
        available: u32,
    },
}

impl GameError for InventoryError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            InventoryError::Insufficient { .. } => "INVENTORY_INSUFFICIENT",
        }
    }
}

/// Object-store failures.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("object `{0}` not found")]
    ObjectNotFound(String),

    #[error(transparent)]
    Inventory(#[from] InventoryError),
}

impl GameError for StateError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            StateError::ObjectNotFound(_) => ErrorSeverity::Internal,
            StateError::Inventory(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            StateError::ObjectNotFound(_) => "STATE_OBJECT_NOT_FOUND",
            StateError::Inventory(err) => err.error_code(),
        }
    }
}
