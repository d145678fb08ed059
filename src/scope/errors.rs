//! Scope registry errors

use thiserror::Error;

use crate::catalog::Scope;

/// Result type for scope registry operations
pub type ScopeResult<T> = Result<T, ScopeError>;

/// Errors raised while loading or registering scope definitions
#[derive(Debug, Clone, Error)]
pub enum ScopeError {
    #[error("Malformed scope file '{path}': {reason}")]
    Malformed { path: String, reason: String },

    #[error("Scope already registered: {0}")]
    Duplicate(Scope),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ScopeError {
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        ScopeError::Malformed {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
