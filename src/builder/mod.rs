//! Version builder
//!
//! Orchestrates product creation and updates:
//!
//! 1. Resolve the scope (the caller's on create, the product's own on update)
//! 2. Validate attribute values against the scope snapshot
//! 3. Plan the image manifest against the latest version's images
//! 4. Store new image bytes
//! 5. Assemble the immutable version and append it
//!
//! Every rejection is detected in steps 1-3, before anything is written.
//! Updates to one product are serialized in-process; the store's
//! compare-and-append catches writers in other processes, and a lost race
//! is retried from step 1 against a fresh view.

mod errors;
mod locks;
mod version_builder;

pub use errors::{CatalogError, CatalogResult, ErrorSeverity};
pub use version_builder::{BuilderOptions, UpdateOutcome, VersionBuilder};
