//! File-backed catalog store
//!
//! Layout under the store root:
//!
//! ```text
//! products/
//!   <id>/
//!     product.json     scope + soft-delete flag (written last on create)
//!     v000001.json     checksummed version records, one file per version
//!     v000002.json
//! ```
//!
//! Version files are published with `hard_link`, which fails if the target
//! exists. That makes "write version N" an atomic compare-and-append
//! across processes sharing the directory.

use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use uuid::Uuid;

use super::backend::{CatalogStore, LatestVersion};
use super::checksum::{seal, unseal};
use super::errors::{StoreError, StoreResult};
use crate::catalog::{Product, ProductId, ProductVersion, Scope, VersionNumber};

const META_FILE: &str = "product.json";

/// Per-product metadata file.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProductMeta {
    id: ProductId,
    scope: Scope,
    #[serde(default)]
    deleted: bool,
}

/// Catalog store persisting products as directories of JSON files.
#[derive(Debug)]
pub struct FileCatalogStore {
    root: PathBuf,
    /// Serializes metadata rewrites within this process.
    meta_lock: Mutex<()>,
}

fn io_error(context: &str, path: &Path, e: std::io::Error) -> StoreError {
    StoreError::IoError(format!("{} {}: {}", context, path.display(), e))
}

impl FileCatalogStore {
    /// Opens (creating if needed) a store rooted at `root`.
    pub fn open(root: PathBuf) -> StoreResult<Self> {
        fs::create_dir_all(&root).map_err(|e| io_error("Failed to create", &root, e))?;
        Ok(Self {
            root,
            meta_lock: Mutex::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn product_dir(&self, product_id: ProductId) -> PathBuf {
        self.root.join(product_id.value().to_string())
    }

    fn version_path(dir: &Path, number: VersionNumber) -> PathBuf {
        dir.join(format!("v{:06}.json", number.value()))
    }

    fn read_meta(&self, product_id: ProductId) -> StoreResult<ProductMeta> {
        let path = self.product_dir(product_id).join(META_FILE);

        let content = match fs::read(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::ProductNotFound(product_id))
            }
            Err(e) => return Err(io_error("Failed to read", &path, e)),
        };

        serde_json::from_slice(&content)
            .map_err(|e| StoreError::corrupt(path.display().to_string(), e.to_string()))
    }

    /// Replaces the metadata file atomically (temp file + rename).
    fn write_meta(&self, dir: &Path, meta: &ProductMeta) -> StoreResult<()> {
        let body = serde_json::to_vec_pretty(meta).map_err(|e| StoreError::Internal(e.to_string()))?;
        let tmp = dir.join(format!(".{}.{}.tmp", META_FILE, Uuid::new_v4()));
        let path = dir.join(META_FILE);

        Self::write_synced(&tmp, &body)?;
        fs::rename(&tmp, &path).map_err(|e| io_error("Failed to publish", &path, e))
    }

    fn write_synced(path: &Path, data: &[u8]) -> StoreResult<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| io_error("Failed to create", path, e))?;

        file.write_all(data)
            .and_then(|_| file.sync_all())
            .map_err(|e| io_error("Failed to write", path, e))
    }

    /// Version numbers present in a product directory, ascending.
    fn version_numbers(dir: &Path) -> StoreResult<Vec<u64>> {
        let entries = fs::read_dir(dir).map_err(|e| io_error("Failed to list", dir, e))?;

        let mut numbers = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| io_error("Failed to list", dir, e))?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };

            if let Some(number) = name
                .strip_prefix('v')
                .and_then(|rest| rest.strip_suffix(".json"))
                .and_then(|digits| digits.parse::<u64>().ok())
            {
                numbers.push(number);
            }
        }

        numbers.sort_unstable();
        Ok(numbers)
    }

    fn latest_number(dir: &Path) -> StoreResult<Option<VersionNumber>> {
        Ok(Self::version_numbers(dir)?
            .last()
            .and_then(|n| VersionNumber::new(*n)))
    }

    /// Reads the version file for `number`; the record inside must carry that number.
    fn read_version(dir: &Path, number: VersionNumber) -> StoreResult<ProductVersion> {
        let path = Self::version_path(dir, number);
        let framed = fs::read(&path).map_err(|e| io_error("Failed to read", &path, e))?;
        let body = unseal(&framed).map_err(|reason| StoreError::corrupt(path.display().to_string(), reason))?;

        let version: ProductVersion = serde_json::from_slice(body)
            .map_err(|e| StoreError::corrupt(path.display().to_string(), e.to_string()))?;

        if version.number() != number {
            return Err(StoreError::corrupt(
                path.display().to_string(),
                format!("file holds {} instead of {}", version.number(), number),
            ));
        }

        Ok(version)
    }

    /// Publishes a version file unless one with the same number exists.
    ///
    /// Returns false when the number was already taken.
    fn publish_version(dir: &Path, version: &ProductVersion) -> StoreResult<bool> {
        let body = serde_json::to_vec(version).map_err(|e| StoreError::Internal(e.to_string()))?;
        let target = Self::version_path(dir, version.number());
        let tmp = dir.join(format!(".v{:06}.{}.tmp", version.number().value(), Uuid::new_v4()));

        Self::write_synced(&tmp, &seal(&body))?;

        let published = match fs::hard_link(&tmp, &target) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(io_error("Failed to publish", &target, e)),
        };

        let _ = fs::remove_file(&tmp);
        published
    }

    /// Claims the lowest id above every existing product directory.
    fn claim_product_dir(&self) -> StoreResult<(ProductId, PathBuf)> {
        loop {
            let entries = fs::read_dir(&self.root).map_err(|e| io_error("Failed to list", &self.root, e))?;

            let mut highest = 0;
            for entry in entries {
                let entry = entry.map_err(|e| io_error("Failed to list", &self.root, e))?;
                if let Some(id) = entry.file_name().to_str().and_then(|n| n.parse::<u64>().ok()) {
                    highest = highest.max(id);
                }
            }

            let id = ProductId::new(highest + 1);
            let dir = self.product_dir(id);
            match fs::create_dir(&dir) {
                Ok(()) => return Ok((id, dir)),
                // Another writer claimed it; rescan.
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(io_error("Failed to create", &dir, e)),
            }
        }
    }
}

impl CatalogStore for FileCatalogStore {
    fn create_product(&self, scope: &Scope, first: ProductVersion) -> StoreResult<ProductId> {
        if first.number() != VersionNumber::FIRST {
            return Err(StoreError::Internal(format!(
                "first version must be {}, got {}",
                VersionNumber::FIRST,
                first.number()
            )));
        }

        let (id, dir) = self.claim_product_dir()?;

        if !Self::publish_version(&dir, &first)? {
            return Err(StoreError::Internal(format!("fresh product directory {} already had a version", id)));
        }

        // The metadata file makes the product visible.
        let meta = ProductMeta {
            id,
            scope: scope.clone(),
            deleted: false,
        };
        self.write_meta(&dir, &meta)?;

        Ok(id)
    }

    fn load_latest(&self, product_id: ProductId) -> StoreResult<LatestVersion> {
        let meta = self.read_meta(product_id)?;
        let dir = self.product_dir(product_id);

        let number = Self::latest_number(&dir)?
            .ok_or_else(|| StoreError::corrupt(dir.display().to_string(), "product has no versions"))?;
        let latest = Self::read_version(&dir, number)?;

        Ok(LatestVersion {
            scope: meta.scope,
            number: latest.number(),
            images: latest.images().clone(),
            closed_values: latest.closed_values().clone(),
            deleted: meta.deleted,
        })
    }

    fn append_version(&self, product_id: ProductId, version: ProductVersion) -> StoreResult<()> {
        self.read_meta(product_id)?;
        let dir = self.product_dir(product_id);
        let attempted = version.number();

        let conflict = |dir: &Path| -> StoreResult<StoreError> {
            let expected = Self::latest_number(dir)?
                .map(|n| n.next())
                .unwrap_or(VersionNumber::FIRST);
            Ok(StoreError::Conflict {
                product_id,
                attempted,
                expected,
            })
        };

        // The predecessor must exist, otherwise the caller is ahead of the history.
        let has_predecessor = attempted
            .value()
            .checked_sub(1)
            .and_then(VersionNumber::new)
            .map(|prev| Self::version_path(&dir, prev).exists())
            .unwrap_or(false);
        if !has_predecessor {
            return Err(conflict(&dir)?);
        }

        if !Self::publish_version(&dir, &version)? {
            return Err(conflict(&dir)?);
        }

        Ok(())
    }

    fn load_product(&self, product_id: ProductId) -> StoreResult<Product> {
        let meta = self.read_meta(product_id)?;
        let dir = self.product_dir(product_id);

        let mut versions = Vec::new();
        for number in Self::version_numbers(&dir)? {
            let number = VersionNumber::new(number)
                .ok_or_else(|| StoreError::corrupt(dir.display().to_string(), "version file numbered 0"))?;
            versions.push(Self::read_version(&dir, number)?);
        }

        let product = Product::from_parts(meta.id, meta.scope, meta.deleted, versions);
        if !product.has_contiguous_history() {
            return Err(StoreError::corrupt(
                dir.display().to_string(),
                "version history is not contiguous",
            ));
        }

        Ok(product)
    }

    fn load_version(&self, product_id: ProductId, number: VersionNumber) -> StoreResult<ProductVersion> {
        self.read_meta(product_id)?;
        let path = Self::version_path(&self.product_dir(product_id), number);

        if !path.exists() {
            return Err(StoreError::VersionNotFound {
                product_id,
                version: number,
            });
        }

        Self::read_version(&self.product_dir(product_id), number)
    }

    fn set_deleted(&self, product_id: ProductId, deleted: bool) -> StoreResult<()> {
        let _guard = self
            .meta_lock
            .lock()
            .map_err(|_| StoreError::Internal("Lock poisoned".into()))?;

        let mut meta = self.read_meta(product_id)?;
        meta.deleted = deleted;
        self.write_meta(&self.product_dir(product_id), &meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::sample_version;
    use tempfile::TempDir;

    fn phones() -> Scope {
        Scope::new("Electronics", "Phones", "Android")
    }

    fn open_store() -> (TempDir, FileCatalogStore) {
        let temp = TempDir::new().unwrap();
        let store = FileCatalogStore::open(temp.path().join("products")).unwrap();
        (temp, store)
    }

    #[test]
    fn test_create_and_load() {
        let (_temp, store) = open_store();
        let id = store.create_product(&phones(), sample_version(1)).unwrap();

        let product = store.load_product(id).unwrap();
        assert_eq!(product.id(), id);
        assert_eq!(product.scope(), &phones());
        assert_eq!(product.versions().len(), 1);
        assert_eq!(product.latest().unwrap().name(), "Phone");
        assert!(!product.is_deleted());
    }

    #[test]
    fn test_ids_are_sequential() {
        let (_temp, store) = open_store();
        let a = store.create_product(&phones(), sample_version(1)).unwrap();
        let b = store.create_product(&phones(), sample_version(1)).unwrap();
        assert_eq!(a.value() + 1, b.value());
    }

    #[test]
    fn test_append_is_compare_and_append() {
        let (_temp, store) = open_store();
        let id = store.create_product(&phones(), sample_version(1)).unwrap();

        store.append_version(id, sample_version(2)).unwrap();

        let duplicate = store.append_version(id, sample_version(2));
        assert!(matches!(duplicate, Err(StoreError::Conflict { .. })));

        let gap = store.append_version(id, sample_version(4));
        match gap {
            Err(StoreError::Conflict { expected, .. }) => assert_eq!(expected.value(), 3),
            other => panic!("expected conflict, got {:?}", other),
        }

        assert_eq!(store.load_latest(id).unwrap().number.value(), 2);
    }

    #[test]
    fn test_versions_survive_reopen() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("products");

        let id = {
            let store = FileCatalogStore::open(root.clone()).unwrap();
            let id = store.create_product(&phones(), sample_version(1)).unwrap();
            store.append_version(id, sample_version(2)).unwrap();
            id
        };

        let store = FileCatalogStore::open(root).unwrap();
        let product = store.load_product(id).unwrap();
        assert_eq!(product.versions().len(), 2);
        assert_eq!(product.latest().unwrap().image("front").unwrap().as_str(), "front-2.jpg");
    }

    #[test]
    fn test_corruption_detected() {
        let (_temp, store) = open_store();
        let id = store.create_product(&phones(), sample_version(1)).unwrap();

        let path = FileCatalogStore::version_path(&store.product_dir(id), VersionNumber::FIRST);
        let mut content = fs::read(&path).unwrap();
        let last = content.len() - 3;
        content[last] ^= 0x20;
        fs::write(&path, content).unwrap();

        assert!(matches!(store.load_latest(id), Err(StoreError::Corrupt { .. })));
    }

    #[test]
    fn test_misplaced_version_file_detected() {
        let (_temp, store) = open_store();
        let id = store.create_product(&phones(), sample_version(1)).unwrap();

        let dir = store.product_dir(id);
        let v2 = VersionNumber::FIRST.next();
        fs::copy(
            FileCatalogStore::version_path(&dir, VersionNumber::FIRST),
            FileCatalogStore::version_path(&dir, v2),
        )
        .unwrap();

        assert!(matches!(store.load_latest(id), Err(StoreError::Corrupt { .. })));
        assert!(matches!(store.load_version(id, v2), Err(StoreError::Corrupt { .. })));
        assert!(matches!(store.load_product(id), Err(StoreError::Corrupt { .. })));
    }

    #[test]
    fn test_unknown_product() {
        let (_temp, store) = open_store();
        let missing = ProductId::new(7);
        assert!(matches!(store.load_latest(missing), Err(StoreError::ProductNotFound(_))));
        assert!(matches!(store.set_deleted(missing, true), Err(StoreError::ProductNotFound(_))));
    }

    #[test]
    fn test_set_deleted_persists() {
        let (_temp, store) = open_store();
        let id = store.create_product(&phones(), sample_version(1)).unwrap();

        store.set_deleted(id, true).unwrap();
        assert!(store.load_product(id).unwrap().is_deleted());
        assert_eq!(store.load_product(id).unwrap().versions().len(), 1);
    }

    #[test]
    fn test_load_version() {
        let (_temp, store) = open_store();
        let id = store.create_product(&phones(), sample_version(1)).unwrap();

        assert_eq!(store.load_version(id, VersionNumber::FIRST).unwrap().price(), 19_900);
        assert!(matches!(
            store.load_version(id, VersionNumber::new(2).unwrap()),
            Err(StoreError::VersionNotFound { .. })
        ));
    }
}
