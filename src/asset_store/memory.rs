//! # In-Memory Asset Store

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use uuid::Uuid;

use super::backend::AssetStore;
use super::errors::{AssetResult, AssetStoreError};
use crate::catalog::FileReference;

/// Asset store keeping bytes in memory. Counts writes.
#[derive(Debug, Default)]
pub struct MemoryAssetStore {
    assets: RwLock<HashMap<FileReference, Vec<u8>>>,
    writes: AtomicU64,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful writes since creation
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    /// Number of stored entries.
    ///
    /// Reads through a poisoned lock: every write inserts whole entries,
    /// so the count stays exact after a panicking writer.
    pub fn len(&self) -> usize {
        self.assets
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AssetStore for MemoryAssetStore {
    fn write(&self, data: &[u8]) -> AssetResult<FileReference> {
        let reference = FileReference::new(format!("mem-{}", Uuid::new_v4()));

        let mut assets = self
            .assets
            .write()
            .map_err(|_| AssetStoreError::Internal("Lock poisoned".into()))?;

        if assets.contains_key(&reference) {
            return Err(AssetStoreError::AlreadyExists(reference.to_string()));
        }
        assets.insert(reference.clone(), data.to_vec());
        self.writes.fetch_add(1, Ordering::Relaxed);

        Ok(reference)
    }

    fn read(&self, reference: &FileReference) -> AssetResult<Vec<u8>> {
        let assets = self
            .assets
            .read()
            .map_err(|_| AssetStoreError::Internal("Lock poisoned".into()))?;

        assets
            .get(reference)
            .cloned()
            .ok_or_else(|| AssetStoreError::NotFound(reference.to_string()))
    }

    fn exists(&self, reference: &FileReference) -> AssetResult<bool> {
        let assets = self
            .assets
            .read()
            .map_err(|_| AssetStoreError::Internal("Lock poisoned".into()))?;
        Ok(assets.contains_key(reference))
    }
}
