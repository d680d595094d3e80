//! Catalog management: product creation, edits, deletion, and read
//! projections. Quantity-bearing fields are off-limits here; only the
//! movement protocol mutates them.

use chrono::Utc;

use stockroom_catalog::{NewProduct, Product, ProductPatch};
use stockroom_core::ProductId;

use crate::error::ServiceError;
use crate::store::ProductStore;

#[derive(Debug)]
pub struct CatalogService<P> {
    products: P,
}

impl<P> CatalogService<P>
where
    P: ProductStore,
{
    pub fn new(products: P) -> Self {
        Self { products }
    }

    /// Create a product. SKU uniqueness is enforced here, against the
    /// normalized SKU.
    pub fn create(&self, input: NewProduct) -> Result<Product, ServiceError> {
        let product = Product::create(ProductId::new(), input, Utc::now())?;

        if self.products.find_by_sku(&product.sku)?.is_some() {
            return Err(ServiceError::Conflict(
                "product with this SKU already exists".to_string(),
            ));
        }

        self.products.insert(product.clone())?;
        tracing::debug!(product_id = %product.id, sku = %product.sku, "product created");
        Ok(product)
    }

    /// Edit descriptive fields. A SKU rename re-checks uniqueness against the
    /// rest of the catalog.
    pub fn update(&self, id: ProductId, patch: ProductPatch) -> Result<Product, ServiceError> {
        let mut product = self.products.get(id)?.ok_or(ServiceError::NotFound)?;

        product.apply_patch(patch, Utc::now())?;

        if let Some(existing) = self.products.find_by_sku(&product.sku)? {
            if existing.id != id {
                return Err(ServiceError::Conflict(
                    "product with this SKU already exists".to_string(),
                ));
            }
        }

        self.products.update(product.clone())?;
        Ok(product)
    }

    /// Remove the catalog row. Ledger records referencing it remain.
    pub fn delete(&self, id: ProductId) -> Result<(), ServiceError> {
        if self.products.remove(id)? {
            Ok(())
        } else {
            Err(ServiceError::NotFound)
        }
    }

    pub fn get(&self, id: ProductId) -> Result<Product, ServiceError> {
        self.products.get(id)?.ok_or(ServiceError::NotFound)
    }

    /// All products, newest first.
    pub fn list(&self) -> Result<Vec<Product>, ServiceError> {
        Ok(self.products.list()?)
    }

    /// Active products at/below their reorder threshold.
    pub fn low_stock(&self) -> Result<Vec<Product>, ServiceError> {
        let mut products = self.products.list()?;
        products.retain(|p| p.is_low_stock());
        Ok(products)
    }
}
