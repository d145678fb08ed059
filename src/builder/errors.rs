//! Catalog error taxonomy
//!
//! | Code                      | Severity  |
//! |---------------------------|-----------|
//! | CATALOG_SCOPE_NOT_FOUND   | REJECT    |
//! | CATALOG_PRODUCT_NOT_FOUND | REJECT    |
//! | CATALOG_INVALID_INPUT     | REJECT    |
//! | CATALOG_SPEC_REJECTED     | REJECT    |
//! | CATALOG_IMAGE_REJECTED    | REJECT    |
//! | CATALOG_STORAGE_CONFLICT  | RETRYABLE |
//! | CATALOG_STORAGE_FAILURE   | FATAL     |

use std::fmt;
use thiserror::Error;

use crate::asset_store::AssetStoreError;
use crate::catalog::{ProductId, Scope};
use crate::image::ImageRejection;
use crate::scope::ScopeError;
use crate::specification::SpecViolations;
use crate::store::StoreError;

/// How a caller should treat an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// The request itself is wrong
    Reject,
    /// A concurrent writer won; the request may succeed if resubmitted
    Retryable,
    /// The attempt failed for reasons outside the request
    Fatal,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Reject => write!(f, "REJECT"),
            ErrorSeverity::Retryable => write!(f, "RETRYABLE"),
            ErrorSeverity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Errors surfaced by create and update
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("Scope not found: {0}")]
    ScopeNotFound(Scope),

    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Specification rejected: {0}")]
    SpecRejected(SpecViolations),

    #[error("Image rejected: {0}")]
    ImageRejected(ImageRejection),

    #[error("Storage conflict after {attempts} attempts: {source}")]
    StorageConflict {
        attempts: u32,
        #[source]
        source: StoreError,
    },

    #[error("Storage failure: {0}")]
    StorageFailure(String),
}

impl CatalogError {
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        CatalogError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            CatalogError::ScopeNotFound(_) => "CATALOG_SCOPE_NOT_FOUND",
            CatalogError::ProductNotFound(_) => "CATALOG_PRODUCT_NOT_FOUND",
            CatalogError::InvalidInput { .. } => "CATALOG_INVALID_INPUT",
            CatalogError::SpecRejected(_) => "CATALOG_SPEC_REJECTED",
            CatalogError::ImageRejected(_) => "CATALOG_IMAGE_REJECTED",
            CatalogError::StorageConflict { .. } => "CATALOG_STORAGE_CONFLICT",
            CatalogError::StorageFailure(_) => "CATALOG_STORAGE_FAILURE",
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CatalogError::StorageConflict { .. } => ErrorSeverity::Retryable,
            CatalogError::StorageFailure(_) => ErrorSeverity::Fatal,
            _ => ErrorSeverity::Reject,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.severity() == ErrorSeverity::Retryable
    }
}

impl From<StoreError> for CatalogError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::ProductNotFound(id) => CatalogError::ProductNotFound(id),
            conflict @ StoreError::Conflict { .. } => CatalogError::StorageConflict {
                attempts: 1,
                source: conflict,
            },
            other => CatalogError::StorageFailure(other.to_string()),
        }
    }
}

impl From<ScopeError> for CatalogError {
    fn from(e: ScopeError) -> Self {
        CatalogError::StorageFailure(e.to_string())
    }
}

impl From<AssetStoreError> for CatalogError {
    fn from(e: AssetStoreError) -> Self {
        CatalogError::StorageFailure(e.to_string())
    }
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;
