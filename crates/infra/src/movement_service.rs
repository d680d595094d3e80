//! The movement protocol (application-level orchestration).
//!
//! For every requested movement this pipeline runs to completion before
//! returning:
//!
//! ```text
//! MovementRequest
//!   ↓
//! 1. Validate input (deterministic, no state touched)
//!   ↓
//! 2. Acquire the product's serialization lock
//!   ↓
//! 3. Load the product, compute previous/new balance (pure domain logic)
//!   ↓
//! 4. Append the immutable ledger record (ledger write FIRST)
//!   ↓
//! 5. Persist the updated product row
//! ```
//!
//! Steps 3–5 run under the per-product lock, so movements against one product
//! are serializable; movements against different products proceed in
//! parallel. A single timestamp captured per call feeds both the ledger
//! `date` and the product's `last_movement_date`.
//!
//! If step 5 fails after step 4 succeeded, the ledger holds an orphaned (but
//! auditable) entry: the failure is logged at error level and surfaced as
//! `StoreError::Inconsistent`, never swallowed. The reverse ordering would
//! silently lose ledger entries, which is the unrecoverable case.

use chrono::{DateTime, Utc};
use serde::Serialize;

use stockroom_auth::{UserDirectory, UserProfile};
use stockroom_catalog::Product;
use stockroom_core::{MovementId, ProductId};
use stockroom_movements::{MovementRecord, MovementRequest};

use crate::error::ServiceError;
use crate::locks::ProductLockTable;
use crate::store::{MovementFilter, MovementStore, ProductStore};

/// Summary view of the updated product returned with each movement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub sku: String,
    pub name: String,
    pub category: String,
    pub quantity: i64,
    pub total_in: i64,
    pub total_out: i64,
    pub last_movement_date: DateTime<Utc>,
}

impl ProductSummary {
    fn of(product: &Product) -> Self {
        Self {
            id: product.id,
            sku: product.sku.clone(),
            name: product.name.clone(),
            category: product.category.clone(),
            quantity: product.quantity,
            total_in: product.total_in,
            total_out: product.total_out,
            last_movement_date: product.last_movement_date,
        }
    }
}

/// Result of a successfully applied movement: the ledger entry with its actor
/// resolved for display, plus the updated product summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovementOutcome {
    pub movement: MovementRecord,
    pub product: ProductSummary,
    pub performed_by: Option<UserProfile>,
}

/// Product identity attached to a movement at read time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRef {
    pub id: ProductId,
    pub sku: String,
    pub name: String,
    pub category: String,
}

/// A ledger record joined with its product and actor summaries.
///
/// Movements hold weak references by id; the joins happen here, at the query
/// boundary, never as embedded back-pointers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovementView {
    pub movement: MovementRecord,
    pub product: Option<ProductRef>,
    pub performed_by: Option<UserProfile>,
}

/// Movement protocol service: applies movements and answers ledger queries.
#[derive(Debug)]
pub struct MovementService<P, M, D> {
    products: P,
    movements: M,
    users: D,
    locks: ProductLockTable,
}

impl<P, M, D> MovementService<P, M, D>
where
    P: ProductStore,
    M: MovementStore,
    D: UserDirectory,
{
    pub fn new(products: P, movements: M, users: D) -> Self {
        Self {
            products,
            movements,
            users,
            locks: ProductLockTable::new(),
        }
    }

    /// Apply one movement: validate, serialize per product, append the ledger
    /// record, update the product row. See the module docs for the ordering
    /// and failure contract.
    pub fn apply(&self, request: MovementRequest) -> Result<MovementOutcome, ServiceError> {
        request.validate()?;

        let lock = self.locks.entry(request.product_id)?;
        let _guard = lock
            .lock()
            .map_err(|_| ServiceError::Storage(crate::store::StoreError::unavailable(
                "product lock poisoned",
            )))?;

        let mut product = self
            .products
            .get(request.product_id)?
            .ok_or(ServiceError::NotFound)?;

        // One timestamp for the whole logical operation: ledger date and
        // product last_movement_date are guaranteed identical.
        let now = Utc::now();
        let change = product.apply_movement(request.movement_type, request.quantity, now)?;

        let record = MovementRecord {
            id: MovementId::new(),
            product_id: request.product_id,
            movement_type: request.movement_type,
            quantity: request.quantity,
            reason: request.reason.trim().to_string(),
            reference: request.reference,
            notes: request.notes,
            performed_by: request.performed_by,
            date: now,
            previous_stock: change.previous_stock,
            new_stock: change.new_stock,
        };

        self.movements.append(record.clone())?;

        if let Err(e) = self.products.update(product.clone()) {
            tracing::error!(
                product_id = %product.id,
                movement_id = %record.id,
                "product update failed after ledger append: {e}"
            );
            return Err(ServiceError::Storage(
                crate::store::StoreError::inconsistent(format!(
                    "ledger entry {} recorded without its product update: {e}",
                    record.id
                )),
            ));
        }

        tracing::debug!(
            product_id = %product.id,
            movement_type = %record.movement_type,
            quantity = record.quantity,
            new_stock = record.new_stock,
            "movement applied"
        );

        let performed_by = self.users.get(record.performed_by);

        Ok(MovementOutcome {
            movement: record,
            product: ProductSummary::of(&product),
            performed_by,
        })
    }

    /// Matching ledger records, newest first, joined with product and actor
    /// summaries.
    pub fn list(&self, filter: &MovementFilter) -> Result<Vec<MovementView>, ServiceError> {
        let records = self.movements.list(filter)?;
        self.join(records)
    }

    /// Full movement history for one product, newest first, actor-joined.
    pub fn history(&self, product_id: ProductId) -> Result<Vec<MovementView>, ServiceError> {
        let records = self.movements.for_product(product_id)?;
        self.join(records)
    }

    fn join(&self, records: Vec<MovementRecord>) -> Result<Vec<MovementView>, ServiceError> {
        records
            .into_iter()
            .map(|record| {
                let product = self.products.get(record.product_id)?.map(|p| ProductRef {
                    id: p.id,
                    sku: p.sku,
                    name: p.name,
                    category: p.category,
                });
                let performed_by = self.users.get(record.performed_by);
                Ok(MovementView {
                    movement: record,
                    product,
                    performed_by,
                })
            })
            .collect()
    }
}
