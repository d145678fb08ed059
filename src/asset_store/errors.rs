//! # Asset Store Errors

use thiserror::Error;

/// Result type for asset store operations
pub type AssetResult<T> = Result<T, AssetStoreError>;

/// Asset store errors
#[derive(Debug, Clone, Error)]
pub enum AssetStoreError {
    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Asset already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid file reference: {0}")]
    InvalidReference(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AssetStoreError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            AssetStoreError::NotFound(_) => "ASSET_NOT_FOUND",
            AssetStoreError::AlreadyExists(_) => "ASSET_ALREADY_EXISTS",
            AssetStoreError::InvalidReference(_) => "ASSET_INVALID_REFERENCE",
            AssetStoreError::IoError(_) => "ASSET_IO_ERROR",
            AssetStoreError::Internal(_) => "ASSET_INTERNAL",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(AssetStoreError::NotFound("x".into()).code(), "ASSET_NOT_FOUND");
        assert_eq!(AssetStoreError::IoError("disk".into()).code(), "ASSET_IO_ERROR");
    }

    #[test]
    fn test_display() {
        let err = AssetStoreError::InvalidReference("../etc/passwd".into());
        assert_eq!(err.to_string(), "Invalid file reference: ../etc/passwd");
    }
}
