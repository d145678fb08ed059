//! Catalog store errors

use thiserror::Error;

use crate::catalog::{ProductId, VersionNumber};

/// Result type for catalog store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Catalog store errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    #[error("Product {product_id} has no version {version}")]
    VersionNotFound {
        product_id: ProductId,
        version: VersionNumber,
    },

    /// Another writer appended first.
    #[error("Version conflict on product {product_id}: attempted {attempted}, next is {expected}")]
    Conflict {
        product_id: ProductId,
        attempted: VersionNumber,
        expected: VersionNumber,
    },

    #[error("Corrupt record '{path}': {reason}")]
    Corrupt { path: String, reason: String },

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl StoreError {
    pub fn corrupt(path: impl Into<String>, reason: impl Into<String>) -> Self {
        StoreError::Corrupt {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether retrying against a fresh view of the product can succeed
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }
}
