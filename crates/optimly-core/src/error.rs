//! Error types for the Optimly engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Optimly workspace.
///
/// Every variant is recoverable: callers convert it into a transient
/// notification for the user and keep the flow state as it was.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OptimlyError {
    /// A wizard step's required input is missing
    #[error("Step '{step}' is incomplete: {message}")]
    Validation { step: String, message: String },

    /// A winner was recorded for a model whose result group does not contain it
    #[error("Result '{result_id}' is not a {model} result")]
    InvalidWinnerAssignment { model: String, result_id: String },

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// An id already exists in a collection that requires unique ids
    #[error("Duplicate {entity_type} id '{id}'")]
    DuplicateId {
        entity_type: &'static str,
        id: String,
    },

    /// A second control variant was added to a variant set
    #[error("Variant set already has control variant '{existing}'")]
    DuplicateControl { existing: String },

    /// The same mock operation was started while a previous call is in flight
    #[error("Operation '{0}' is already running")]
    OperationPending(String),

    /// The session was abandoned while the operation was pending
    #[error("Operation '{0}' was cancelled")]
    Cancelled(String),

    /// The flow was completed; a new session is required
    #[error("Session has already been completed")]
    SessionTerminated,

    /// An action that is only valid on a particular step
    #[error("Invalid step: {0}")]
    InvalidStep(String),

    /// CMS webhook dispatch failed
    #[error("Webhook error: {0}")]
    Webhook(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl OptimlyError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Validation error for the named step
    pub fn validation(step: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            step: step.into(),
            message: message.into(),
        }
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a DuplicateId error
    pub fn duplicate_id(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::DuplicateId {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Webhook error
    pub fn webhook(message: impl Into<String>) -> Self {
        Self::Webhook(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error came from a cancelled mock operation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }

    /// Check if this is a webhook dispatch error
    pub fn is_webhook(&self) -> bool {
        matches!(self, Self::Webhook(_))
    }

    /// Whether the error is shown to the user as a transient notice.
    ///
    /// Cancellation is silent: it only happens after the user left the flow.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, Self::Cancelled(_) | Self::Internal(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for OptimlyError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for OptimlyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for OptimlyError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for OptimlyError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, OptimlyError>`.
pub type Result<T> = std::result::Result<T, OptimlyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_names_step() {
        let err = OptimlyError::validation("Brand Name", "Brand name is required");
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "Step 'Brand Name' is incomplete: Brand name is required"
        );
    }

    #[test]
    fn test_cancelled_is_not_user_facing() {
        assert!(!OptimlyError::Cancelled("detect_intent".into()).is_user_facing());
        assert!(OptimlyError::webhook("connection refused").is_user_facing());
    }

    #[test]
    fn test_io_conversion_keeps_kind() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: OptimlyError = io.into();
        match err {
            OptimlyError::Io { message } => assert!(message.contains("NotFound")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
