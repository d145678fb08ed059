//! In-memory catalog store
//!
//! An arena of products keyed by id. The write lock makes the
//! number check and the append one atomic step.

use std::collections::BTreeMap;
use std::sync::RwLock;

use super::backend::{CatalogStore, LatestVersion};
use super::errors::{StoreError, StoreResult};
use crate::catalog::{Product, ProductId, ProductVersion, Scope, VersionNumber};

#[derive(Debug, Default)]
pub struct MemoryCatalogStore {
    products: RwLock<BTreeMap<ProductId, Product>>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    ///
    /// Reads through a poisoned lock: every write inserts whole entries,
    /// so the count stays exact after a panicking writer.
    pub fn len(&self) -> usize {
        self.products
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> StoreError {
    StoreError::Internal("Lock poisoned".into())
}

impl CatalogStore for MemoryCatalogStore {
    fn create_product(&self, scope: &Scope, first: ProductVersion) -> StoreResult<ProductId> {
        if first.number() != VersionNumber::FIRST {
            return Err(StoreError::Internal(format!(
                "first version must be {}, got {}",
                VersionNumber::FIRST,
                first.number()
            )));
        }

        let mut products = self.products.write().map_err(|_| poisoned())?;

        let next = products.keys().next_back().map_or(1, |id| id.value() + 1);
        let id = ProductId::new(next);
        products.insert(id, Product::new(id, scope.clone(), first));

        Ok(id)
    }

    fn load_latest(&self, product_id: ProductId) -> StoreResult<LatestVersion> {
        let products = self.products.read().map_err(|_| poisoned())?;

        let product = products
            .get(&product_id)
            .ok_or(StoreError::ProductNotFound(product_id))?;
        let latest = product
            .latest()
            .ok_or_else(|| StoreError::corrupt(product_id.to_string(), "product has no versions"))?;

        Ok(LatestVersion::of(product, latest))
    }

    fn append_version(&self, product_id: ProductId, version: ProductVersion) -> StoreResult<()> {
        let mut products = self.products.write().map_err(|_| poisoned())?;

        let product = products
            .get_mut(&product_id)
            .ok_or(StoreError::ProductNotFound(product_id))?;

        let expected = product.next_version_number();
        let attempted = version.number();
        if !product.push_next(version) {
            return Err(StoreError::Conflict {
                product_id,
                attempted,
                expected,
            });
        }

        Ok(())
    }

    fn load_product(&self, product_id: ProductId) -> StoreResult<Product> {
        let products = self.products.read().map_err(|_| poisoned())?;
        products
            .get(&product_id)
            .cloned()
            .ok_or(StoreError::ProductNotFound(product_id))
    }

    fn load_version(&self, product_id: ProductId, number: VersionNumber) -> StoreResult<ProductVersion> {
        let products = self.products.read().map_err(|_| poisoned())?;
        let product = products
            .get(&product_id)
            .ok_or(StoreError::ProductNotFound(product_id))?;

        product.version(number).cloned().ok_or(StoreError::VersionNotFound {
            product_id,
            version: number,
        })
    }

    fn set_deleted(&self, product_id: ProductId, deleted: bool) -> StoreResult<()> {
        let mut products = self.products.write().map_err(|_| poisoned())?;
        let product = products
            .get_mut(&product_id)
            .ok_or(StoreError::ProductNotFound(product_id))?;

        product.set_deleted(deleted);
        Ok(())
    }
}
