//! ProductVersion - Immutable product version
//!
//! A version is assembled once by the version builder and never changes
//! afterwards. All fields are private; only accessors are exposed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::VersionNumber;

/// A (specification name, value) pair attached to a version.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct SpecPair {
    pub name: String,
    pub value: String,
}

impl SpecPair {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for SpecPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// Opaque handle to stored image bytes.
///
/// Handed out by an asset store on write. The same reference may be
/// carried by many versions; it is never overwritten or deleted.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileReference(String);

impl FileReference {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything needed to assemble a version.
#[derive(Debug)]
pub(crate) struct VersionParts {
    pub number: VersionNumber,
    pub name: String,
    pub description: String,
    pub price: u64,
    pub closed_values: BTreeSet<SpecPair>,
    pub open_values: BTreeSet<SpecPair>,
    pub images: BTreeMap<String, FileReference>,
}

/// A single immutable product version.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVersion {
    number: VersionNumber,
    name: String,
    description: String,
    /// Price in the smallest currency unit.
    price: u64,
    closed_values: BTreeSet<SpecPair>,
    open_values: BTreeSet<SpecPair>,
    /// Slot name -> stored image.
    images: BTreeMap<String, FileReference>,
    created_at: DateTime<Utc>,
}

impl ProductVersion {
    pub(crate) fn assemble(parts: VersionParts) -> Self {
        Self {
            number: parts.number,
            name: parts.name,
            description: parts.description,
            price: parts.price,
            closed_values: parts.closed_values,
            open_values: parts.open_values,
            images: parts.images,
            created_at: Utc::now(),
        }
    }

    #[inline]
    pub fn number(&self) -> VersionNumber {
        self.number
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    #[inline]
    pub fn price(&self) -> u64 {
        self.price
    }

    pub fn closed_values(&self) -> &BTreeSet<SpecPair> {
        &self.closed_values
    }

    pub fn open_values(&self) -> &BTreeSet<SpecPair> {
        &self.open_values
    }

    pub fn images(&self) -> &BTreeMap<String, FileReference> {
        &self.images
    }

    /// Returns the stored image for a slot, if the version has one.
    pub fn image(&self, slot: &str) -> Option<&FileReference> {
        self.images.get(slot)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
pub(crate) fn sample_version(number: u64) -> ProductVersion {
    let mut images = BTreeMap::new();
    images.insert("front".to_string(), FileReference::new(format!("front-{}.jpg", number)));

    let mut closed_values = BTreeSet::new();
    closed_values.insert(SpecPair::new("Color", "Black"));

    ProductVersion::assemble(VersionParts {
        number: VersionNumber::new(number).unwrap(),
        name: "Phone".into(),
        description: "A phone".into(),
        price: 19_900,
        closed_values,
        open_values: BTreeSet::new(),
        images,
    })
}
