use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use stockroom_catalog::Product;
use stockroom_core::ProductId;

use super::StoreError;

/// Product row storage.
///
/// `update` replaces the whole row; callers are expected to hold the
/// per-product serialization lock around any read-modify-write.
pub trait ProductStore: Send + Sync {
    fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    /// Lookup by case-normalized SKU (uniqueness checks).
    fn find_by_sku(&self, sku: &str) -> Result<Option<Product>, StoreError>;

    /// All products, newest first.
    fn list(&self) -> Result<Vec<Product>, StoreError>;

    fn insert(&self, product: Product) -> Result<(), StoreError>;

    fn update(&self, product: Product) -> Result<(), StoreError>;

    /// Remove a row. Returns whether anything was removed.
    fn remove(&self, id: ProductId) -> Result<bool, StoreError>;
}

impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        (**self).get(id)
    }

    fn find_by_sku(&self, sku: &str) -> Result<Option<Product>, StoreError> {
        (**self).find_by_sku(sku)
    }

    fn list(&self) -> Result<Vec<Product>, StoreError> {
        (**self).list()
    }

    fn insert(&self, product: Product) -> Result<(), StoreError> {
        (**self).insert(product)
    }

    fn update(&self, product: Product) -> Result<(), StoreError> {
        (**self).update(product)
    }

    fn remove(&self, id: ProductId) -> Result<bool, StoreError> {
        (**self).remove(id)
    }
}

/// In-memory product store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    rows: RwLock<HashMap<ProductId, Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProductStore for InMemoryProductStore {
    fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let rows = self
            .rows
            .read()
            .map_err(|_| StoreError::unavailable("product store lock poisoned"))?;
        Ok(rows.get(&id).cloned())
    }

    fn find_by_sku(&self, sku: &str) -> Result<Option<Product>, StoreError> {
        let rows = self
            .rows
            .read()
            .map_err(|_| StoreError::unavailable("product store lock poisoned"))?;
        Ok(rows.values().find(|p| p.sku == sku).cloned())
    }

    fn list(&self) -> Result<Vec<Product>, StoreError> {
        let rows = self
            .rows
            .read()
            .map_err(|_| StoreError::unavailable("product store lock poisoned"))?;
        let mut products: Vec<Product> = rows.values().cloned().collect();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(products)
    }

    fn insert(&self, product: Product) -> Result<(), StoreError> {
        let mut rows = self
            .rows
            .write()
            .map_err(|_| StoreError::unavailable("product store lock poisoned"))?;
        rows.insert(product.id, product);
        Ok(())
    }

    fn update(&self, product: Product) -> Result<(), StoreError> {
        let mut rows = self
            .rows
            .write()
            .map_err(|_| StoreError::unavailable("product store lock poisoned"))?;
        if !rows.contains_key(&product.id) {
            return Err(StoreError::inconsistent(format!(
                "product {} vanished during update",
                product.id
            )));
        }
        rows.insert(product.id, product);
        Ok(())
    }

    fn remove(&self, id: ProductId) -> Result<bool, StoreError> {
        let mut rows = self
            .rows
            .write()
            .map_err(|_| StoreError::unavailable("product store lock poisoned"))?;
        Ok(rows.remove(&id).is_some())
    }
}
