//! Common error infrastructure for puzzle-core.
//!
//! Domain-specific errors (`ValidationError`, `InventoryError`, `StateError`)
//! live next to the code that raises them and share the classification trait
//! defined here.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the same action may succeed once the world changes
/// - **Validation**: invalid input that should be rejected without retry
/// - **Internal**: unexpected state inconsistencies that require investigation
/// - **Fatal**: unrecoverable errors indicating corrupted state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorSeverity {
    /// Examples: path blocked, missing resources, missing key.
    Recoverable,

    /// Examples: unknown build kind, malformed parameters.
    Validation,

    /// Examples: object id vanished between validation and commit.
    Internal,

    /// Examples: state invariant violated beyond repair.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all puzzle-core errors.
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
