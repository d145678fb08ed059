//! # Local Filesystem Asset Store

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::backend::AssetStore;
use super::errors::{AssetResult, AssetStoreError};
use crate::catalog::FileReference;

/// Asset store writing one file per asset under a root directory.
///
/// References are bare file names (`<uuid>.<ext>`); files are opened with
/// `create_new`, so an existing file can never be replaced.
#[derive(Debug)]
pub struct LocalAssetStore {
    root: PathBuf,
    extension: String,
}

impl LocalAssetStore {
    /// Create a store for JPEG assets
    pub fn new(root: PathBuf) -> Self {
        Self::with_extension(root, "jpg")
    }

    pub fn with_extension(root: PathBuf, extension: impl Into<String>) -> Self {
        Self {
            root,
            extension: extension.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn full_path(&self, reference: &FileReference) -> AssetResult<PathBuf> {
        let name = reference.as_str();
        if name.is_empty() || name.contains('/') || name.contains('\\') || name.starts_with('.') {
            return Err(AssetStoreError::InvalidReference(name.to_string()));
        }
        Ok(self.root.join(name))
    }
}

impl AssetStore for LocalAssetStore {
    fn write(&self, data: &[u8]) -> AssetResult<FileReference> {
        fs::create_dir_all(&self.root).map_err(|e| AssetStoreError::IoError(e.to_string()))?;

        let reference = FileReference::new(format!("{}.{}", Uuid::new_v4(), self.extension));
        let full_path = self.full_path(&reference)?;

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&full_path)
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::AlreadyExists {
                    AssetStoreError::AlreadyExists(reference.to_string())
                } else {
                    AssetStoreError::IoError(e.to_string())
                }
            })?;

        file.write_all(data)
            .and_then(|_| file.sync_all())
            .map_err(|e| AssetStoreError::IoError(e.to_string()))?;

        Ok(reference)
    }

    fn read(&self, reference: &FileReference) -> AssetResult<Vec<u8>> {
        let full_path = self.full_path(reference)?;

        fs::read(&full_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AssetStoreError::NotFound(reference.to_string())
            } else {
                AssetStoreError::IoError(e.to_string())
            }
        })
    }

    fn exists(&self, reference: &FileReference) -> AssetResult<bool> {
        Ok(self.full_path(reference)?.exists())
    }
}
