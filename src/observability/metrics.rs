//! Catalog counters
//!
//! - Counters only, monotonic
//! - Reset only on process start
//! - Thread-safe, lock-free

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Operational counters for the catalog engine
///
/// Uses Relaxed ordering; counters are observational only.
#[derive(Debug, Default)]
pub struct CatalogMetrics {
    products_created: AtomicU64,
    versions_appended: AtomicU64,
    spec_rejections: AtomicU64,
    image_rejections: AtomicU64,
    assets_written: AtomicU64,
    conflicts_retried: AtomicU64,
    values_narrowed: AtomicU64,
}

impl CatalogMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_products_created(&self) {
        self.products_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_versions_appended(&self) {
        self.versions_appended.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_spec_rejections(&self) {
        self.spec_rejections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_image_rejections(&self) {
        self.image_rejections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_assets_written(&self) {
        self.assets_written.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_conflicts_retried(&self) {
        self.conflicts_retried.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_values_narrowed(&self, count: u64) {
        self.values_narrowed.fetch_add(count, Ordering::Relaxed);
    }

    /// Take a point-in-time copy of every counter
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            products_created: self.products_created.load(Ordering::Relaxed),
            versions_appended: self.versions_appended.load(Ordering::Relaxed),
            spec_rejections: self.spec_rejections.load(Ordering::Relaxed),
            image_rejections: self.image_rejections.load(Ordering::Relaxed),
            assets_written: self.assets_written.load(Ordering::Relaxed),
            conflicts_retried: self.conflicts_retried.load(Ordering::Relaxed),
            values_narrowed: self.values_narrowed.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of all counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub products_created: u64,
    pub versions_appended: u64,
    pub spec_rejections: u64,
    pub image_rejections: u64,
    pub assets_written: u64,
    pub conflicts_retried: u64,
    pub values_narrowed: u64,
}
