//! Catalog data model
//!
//! A product owns an append-only history of immutable versions:
//! - Version numbers are contiguous, starting at 1
//! - The scope is fixed when the product is created
//! - A version never changes once appended
//! - Image references may be shared between versions, never rewritten

mod ids;
mod input;
mod product;
mod version;

pub use ids::{ProductId, VersionNumber};
pub use input::{ImagePayload, ManifestEntry, VersionInput};
pub use product::{Product, Scope};
pub use version::{FileReference, ProductVersion, SpecPair};

pub(crate) use version::VersionParts;

#[cfg(test)]
pub(crate) use version::sample_version;
