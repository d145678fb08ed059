//! Product - the owner of a version history

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{ProductId, ProductVersion, VersionNumber};

/// The (main category, category, subcategory) path fixing a product's schema.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct Scope {
    pub main_category: String,
    pub category: String,
    pub subcategory: String,
}

impl Scope {
    pub fn new(
        main_category: impl Into<String>,
        category: impl Into<String>,
        subcategory: impl Into<String>,
    ) -> Self {
        Self {
            main_category: main_category.into(),
            category: category.into(),
            subcategory: subcategory.into(),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.main_category, self.category, self.subcategory)
    }
}

/// A product and its complete version history.
///
/// The history is never empty and is ordered by version number.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    scope: Scope,
    deleted: bool,
    versions: Vec<ProductVersion>,
}

impl Product {
    pub(crate) fn new(id: ProductId, scope: Scope, first: ProductVersion) -> Self {
        Self {
            id,
            scope,
            deleted: false,
            versions: vec![first],
        }
    }

    pub(crate) fn from_parts(
        id: ProductId,
        scope: Scope,
        deleted: bool,
        versions: Vec<ProductVersion>,
    ) -> Self {
        Self {
            id,
            scope,
            deleted,
            versions,
        }
    }

    #[inline]
    pub fn id(&self) -> ProductId {
        self.id
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub(crate) fn set_deleted(&mut self, deleted: bool) {
        self.deleted = deleted;
    }

    /// All versions, oldest first.
    pub fn versions(&self) -> &[ProductVersion] {
        &self.versions
    }

    /// The most recently appended version.
    pub fn latest(&self) -> Option<&ProductVersion> {
        self.versions.last()
    }

    pub fn version(&self, number: VersionNumber) -> Option<&ProductVersion> {
        let index = usize::try_from(number.value().checked_sub(1)?).ok()?;
        self.versions.get(index)
    }

    /// The number the next appended version must carry.
    pub fn next_version_number(&self) -> VersionNumber {
        self.latest()
            .map(|v| v.number().next())
            .unwrap_or(VersionNumber::FIRST)
    }

    /// Appends a version if it carries exactly the next number.
    ///
    /// Returns false and leaves the history untouched otherwise.
    pub(crate) fn push_next(&mut self, version: ProductVersion) -> bool {
        if version.number() != self.next_version_number() {
            return false;
        }
        self.versions.push(version);
        true
    }

    /// Checks that version numbers run 1, 2, 3, ... without gaps.
    pub fn has_contiguous_history(&self) -> bool {
        !self.versions.is_empty()
            && self
                .versions
                .iter()
                .enumerate()
                .all(|(i, v)| v.number().value() == i as u64 + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::sample_version;

    fn phones() -> Scope {
        Scope::new("Electronics", "Phones", "Android")
    }

    #[test]
    fn test_new_product_has_one_version() {
        let product = Product::new(ProductId::new(1), phones(), sample_version(1));
        assert_eq!(product.versions().len(), 1);
        assert!(!product.is_deleted());
        assert_eq!(product.next_version_number().value(), 2);
        assert!(product.has_contiguous_history());
    }

    #[test]
    fn test_push_next_rejects_gaps_and_duplicates() {
        let mut product = Product::new(ProductId::new(1), phones(), sample_version(1));

        assert!(!product.push_next(sample_version(1)));
        assert!(!product.push_next(sample_version(3)));
        assert!(product.push_next(sample_version(2)));
        assert_eq!(product.latest().unwrap().number().value(), 2);
        assert!(product.has_contiguous_history());
    }

    #[test]
    fn test_version_lookup() {
        let mut product = Product::new(ProductId::new(1), phones(), sample_version(1));
        product.push_next(sample_version(2));

        let v2 = VersionNumber::new(2).unwrap();
        assert_eq!(product.version(v2).unwrap().number(), v2);
        assert!(product.version(VersionNumber::new(3).unwrap()).is_none());
    }

    #[test]
    fn test_soft_delete_leaves_versions_alone() {
        let mut product = Product::new(ProductId::new(1), phones(), sample_version(1));
        let before = product.versions().to_vec();

        product.set_deleted(true);
        assert!(product.is_deleted());
        assert_eq!(product.versions(), before.as_slice());
    }

    #[test]
    fn test_scope_display() {
        assert_eq!(phones().to_string(), "Electronics/Phones/Android");
    }
}
