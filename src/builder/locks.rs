//! Per-product mutual exclusion
//!
//! Holding a product's lock for load -> validate -> reconcile -> append
//! keeps two in-process updates from computing the same next number.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::catalog::ProductId;

#[derive(Debug, Default)]
pub(crate) struct ProductLocks {
    locks: Mutex<HashMap<ProductId, Arc<Mutex<()>>>>,
}

impl ProductLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the lock for a product, creating it on first use.
    ///
    /// Entries nobody else holds are dropped on the way, so the table only
    /// grows with the number of products being updated concurrently.
    /// `None` if the lock table is poisoned.
    pub fn for_product(&self, product_id: ProductId) -> Option<Arc<Mutex<()>>> {
        let mut locks = self.locks.lock().ok()?;
        locks.retain(|id, lock| *id == product_id || Arc::strong_count(lock) > 1);
        Some(Arc::clone(locks.entry(product_id).or_default()))
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.lock().map(|l| l.len()).unwrap_or_default()
    }
}
