//! Error types for the progress engine

use thiserror::Error;

/// Errors raised by the scoring and gamification engine
///
/// Every engine operation either succeeds completely or returns one of these
/// with the caller's input left untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Malformed date, negative XP, out-of-range target and similar caller
    /// contract violations.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Concurrent modification detected by the storage layer. Retryable.
    #[error("State conflict: {0}")]
    StateConflict(String),
}

impl EngineError {
    pub fn invalid(message: impl Into<String>) -> Self {
        EngineError::InvalidInput(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        EngineError::StateConflict(message.into())
    }

    /// Whether the caller may retry the same request unchanged
    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::StateConflict(_))
    }
}

/// Result alias used throughout the engine
pub type EngineResult<T> = Result<T, EngineError>;
