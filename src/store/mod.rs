//! Catalog store
//!
//! Durable home of products and their version histories.
//!
//! # Guarantees
//!
//! - Append-only: a stored version is never rewritten
//! - Compare-and-append: a version is accepted only if it carries exactly
//!   the next number, otherwise `StoreError::Conflict`
//! - A product becomes visible together with its first version

mod backend;
mod checksum;
mod errors;
mod file;
mod memory;

pub use backend::{CatalogStore, LatestVersion};
pub use errors::{StoreError, StoreResult};
pub use file::FileCatalogStore;
pub use memory::MemoryCatalogStore;
