//! Error types for the trip planner core.

use serde::Serialize;
use thiserror::Error;

/// A shared error type for all planner operations.
///
/// Variants map directly onto the failure taxonomy the planner exposes to
/// its callers: unknown entities, invalid input, upstream capability
/// failures, contract-format violations, and state-machine misuse.
#[derive(Error, Debug, Clone, Serialize)]
pub enum TripError {
    /// Entity not found (session, reservation, itinerary)
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Invalid caller input; the caller must fix the input before retrying
    #[error("Validation error: {0}")]
    Validation(String),

    /// A capability handler was unreachable or timed out
    #[error("Upstream capability error: {message}")]
    Upstream { message: String, retryable: bool },

    /// Handler output failed its format contract after the single allowed retry
    #[error("Parse error: {0}")]
    Parse(String),

    /// An operation was attempted out of the state machine's allowed order.
    /// Logged as a defect; the targeted state is left unchanged.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// The in-flight turn was cancelled by the caller; nothing was persisted
    #[error("Turn cancelled by caller")]
    Cancelled,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TripError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates an Upstream error
    pub fn upstream(message: impl Into<String>, retryable: bool) -> Self {
        Self::Upstream {
            message: message.into(),
            retryable,
        }
    }

    /// Creates a Parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Creates an InvariantViolation error
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is an InvariantViolation error
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::InvariantViolation(_))
    }

    /// Check if the caller may retry the failed operation as-is.
    ///
    /// Only upstream failures carry a retryable flag; every other variant
    /// requires the caller to change something first.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Upstream { retryable: true, .. })
    }
}

impl From<toml::de::Error> for TripError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for TripError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(format!("{} (kind: {:?})", err, err.kind()))
    }
}

/// Conversion from anyhow::Error (transitional, should be removed eventually)
impl From<anyhow::Error> for TripError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, TripError>`.
pub type Result<T> = std::result::Result<T, TripError>;
