//! # Catalog Store Trait

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use super::errors::StoreResult;
use crate::catalog::{FileReference, Product, ProductId, ProductVersion, Scope, SpecPair, VersionNumber};

/// What an update needs to know about a product's newest version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatestVersion {
    pub scope: Scope,
    pub number: VersionNumber,
    pub images: BTreeMap<String, FileReference>,
    pub closed_values: BTreeSet<SpecPair>,
    pub deleted: bool,
}

impl LatestVersion {
    pub fn of(product: &Product, latest: &ProductVersion) -> Self {
        Self {
            scope: product.scope().clone(),
            number: latest.number(),
            images: latest.images().clone(),
            closed_values: latest.closed_values().clone(),
            deleted: product.is_deleted(),
        }
    }
}

/// Durable store of products and versions.
pub trait CatalogStore: Send + Sync + std::fmt::Debug {
    /// Stores a new product with its first version and assigns its id.
    fn create_product(&self, scope: &Scope, first: ProductVersion) -> StoreResult<ProductId>;

    /// Loads the scope and newest version of a product.
    fn load_latest(&self, product_id: ProductId) -> StoreResult<LatestVersion>;

    /// Appends a version if it carries exactly the next number.
    ///
    /// Returns `StoreError::Conflict` when another writer got there first.
    fn append_version(&self, product_id: ProductId, version: ProductVersion) -> StoreResult<()>;

    /// Loads a product with its complete history.
    fn load_product(&self, product_id: ProductId) -> StoreResult<Product>;

    /// Loads a single version.
    fn load_version(&self, product_id: ProductId, number: VersionNumber) -> StoreResult<ProductVersion>;

    /// Sets the soft-delete flag. Versions are untouched.
    fn set_deleted(&self, product_id: ProductId, deleted: bool) -> StoreResult<()>;
}

impl<T: CatalogStore + ?Sized> CatalogStore for Arc<T> {
    fn create_product(&self, scope: &Scope, first: ProductVersion) -> StoreResult<ProductId> {
        (**self).create_product(scope, first)
    }

    fn load_latest(&self, product_id: ProductId) -> StoreResult<LatestVersion> {
        (**self).load_latest(product_id)
    }

    fn append_version(&self, product_id: ProductId, version: ProductVersion) -> StoreResult<()> {
        (**self).append_version(product_id, version)
    }

    fn load_product(&self, product_id: ProductId) -> StoreResult<Product> {
        (**self).load_product(product_id)
    }

    fn load_version(&self, product_id: ProductId, number: VersionNumber) -> StoreResult<ProductVersion> {
        (**self).load_version(product_id, number)
    }

    fn set_deleted(&self, product_id: ProductId, deleted: bool) -> StoreResult<()> {
        (**self).set_deleted(product_id, deleted)
    }
}
