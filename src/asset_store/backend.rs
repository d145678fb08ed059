//! # Asset Store Trait

use std::sync::Arc;

use super::errors::AssetResult;
use crate::catalog::FileReference;

/// Backend trait for image byte storage.
///
/// There is no delete and no write-to-path: callers cannot
/// choose or reuse a reference.
pub trait AssetStore: Send + Sync + std::fmt::Debug {
    /// Persist bytes under a freshly generated name
    fn write(&self, data: &[u8]) -> AssetResult<FileReference>;

    /// Read the bytes behind a reference
    fn read(&self, reference: &FileReference) -> AssetResult<Vec<u8>>;

    /// Check if a reference points at stored bytes
    fn exists(&self, reference: &FileReference) -> AssetResult<bool>;
}

impl<T: AssetStore + ?Sized> AssetStore for Arc<T> {
    fn write(&self, data: &[u8]) -> AssetResult<FileReference> {
        (**self).write(data)
    }

    fn read(&self, reference: &FileReference) -> AssetResult<Vec<u8>> {
        (**self).read(reference)
    }

    fn exists(&self, reference: &FileReference) -> AssetResult<bool> {
        (**self).exists(reference)
    }
}
