//! # Image Asset Storage
//!
//! Write-once byte storage for image assets. Every write produces a new
//! file reference; nothing is ever overwritten or deleted, so references
//! held by old versions stay valid forever.

pub mod backend;
pub mod errors;
pub mod local;
pub mod memory;

pub use backend::AssetStore;
pub use errors::{AssetResult, AssetStoreError};
pub use local::LocalAssetStore;
pub use memory::MemoryAssetStore;
