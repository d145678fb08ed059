//! Image asset reconciliation
//!
//! Decides, per slot of an image manifest, whether a new version keeps
//! the previous version's file, fails on an unresolvable reuse, or stores
//! freshly uploaded bytes.
//!
//! Reconciliation is split in two so every rejection is found before any
//! byte is written:
//! 1. `ImageReconciler::plan` - pure; forwards kept slots, checks uploads
//! 2. `ImagePlan::commit` - one asset write per upload, none for kept slots

mod reconciler;
mod signature;

pub use reconciler::{ImagePlan, ImageReconciler, ImageRejection, UploadCache};
pub use signature::{is_jpeg, JPEG_SIGNATURES};
