//! Error types for the Mentor application.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Mentor application.
///
/// This provides typed, structured error variants that survive the message
/// boundary: errors are serialized into error replies by the actor runtime
/// and deserialized back into typed values by the dispatcher.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum MentorError {
    /// A required field is missing or invalid
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound { entity_type: String, id: String },

    /// No response arrived within the configured request timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Runtime-level failure of an actor's execution unit
    #[error("Actor fault: {0}")]
    ActorFault(String),

    /// Data access error (store layer)
    #[error("Store error: {0}")]
    Store(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MentorError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    /// Creates a Timeout error
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout(message.into())
    }

    /// Creates an ActorFault error
    pub fn actor_fault(message: impl Into<String>) -> Self {
        Self::ActorFault(message.into())
    }

    /// Creates a Store error
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
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
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a Timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Check if this is an ActorFault error
    pub fn is_actor_fault(&self) -> bool {
        matches!(self, Self::ActorFault(_))
    }

    /// Check if this is a Store error
    pub fn is_store(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}

impl From<serde_json::Error> for MentorError {
    fn from(e: serde_json::Error) -> Self {
        MentorError::Serialization(e.to_string())
    }
}

/// Result type alias using MentorError
pub type Result<T> = std::result::Result<T, MentorError>;
