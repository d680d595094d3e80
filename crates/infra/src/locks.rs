//! Per-product serialization.
//!
//! The movement protocol's read-validate-write must be serialized per
//! product: two concurrent movements must never read the same
//! `previous_stock` and commit diverging balances. Movements against
//! different products share nothing and proceed in parallel.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use stockroom_core::ProductId;

use crate::store::StoreError;

/// Mutex table keyed by product id.
///
/// Entries are created on first use and kept for the table's lifetime; one
/// `Arc<Mutex<()>>` per product ever moved is a bounded, tiny footprint.
#[derive(Debug, Default)]
pub struct ProductLockTable {
    inner: Mutex<HashMap<ProductId, Arc<Mutex<()>>>>,
}

impl ProductLockTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch (or create) the lock guarding one product.
    pub fn entry(&self, product_id: ProductId) -> Result<Arc<Mutex<()>>, StoreError> {
        let mut table = self
            .inner
            .lock()
            .map_err(|_| StoreError::unavailable("product lock table poisoned"))?;
        Ok(table.entry(product_id).or_default().clone())
    }
}
