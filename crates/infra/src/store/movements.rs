use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use stockroom_core::ProductId;
use stockroom_movements::{MovementRecord, MovementType};

use super::StoreError;

/// Query filter over the ledger. All criteria are optional and combined with
/// AND; the date range is inclusive on both ends.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovementFilter {
    pub movement_type: Option<MovementType>,
    pub product_id: Option<ProductId>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl MovementFilter {
    pub fn matches(&self, record: &MovementRecord) -> bool {
        if let Some(movement_type) = self.movement_type {
            if record.movement_type != movement_type {
                return false;
            }
        }
        if let Some(product_id) = self.product_id {
            if record.product_id != product_id {
                return false;
            }
        }
        if let Some(from) = self.from {
            if record.date < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if record.date > to {
                return false;
            }
        }
        true
    }
}

/// Append-only ledger storage. No update or delete exists, anywhere.
pub trait MovementStore: Send + Sync {
    fn append(&self, record: MovementRecord) -> Result<(), StoreError>;

    /// Matching records, newest first.
    fn list(&self, filter: &MovementFilter) -> Result<Vec<MovementRecord>, StoreError>;

    /// All records for one product, newest first.
    fn for_product(&self, product_id: ProductId) -> Result<Vec<MovementRecord>, StoreError>;
}

impl<S> MovementStore for Arc<S>
where
    S: MovementStore + ?Sized,
{
    fn append(&self, record: MovementRecord) -> Result<(), StoreError> {
        (**self).append(record)
    }

    fn list(&self, filter: &MovementFilter) -> Result<Vec<MovementRecord>, StoreError> {
        (**self).list(filter)
    }

    fn for_product(&self, product_id: ProductId) -> Result<Vec<MovementRecord>, StoreError> {
        (**self).for_product(product_id)
    }
}

/// In-memory append-only movement store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryMovementStore {
    records: RwLock<Vec<MovementRecord>>,
}

impl InMemoryMovementStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MovementStore for InMemoryMovementStore {
    fn append(&self, record: MovementRecord) -> Result<(), StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::unavailable("movement store lock poisoned"))?;
        records.push(record);
        Ok(())
    }

    fn list(&self, filter: &MovementFilter) -> Result<Vec<MovementRecord>, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::unavailable("movement store lock poisoned"))?;
        let mut matched: Vec<MovementRecord> =
            records.iter().filter(|r| filter.matches(r)).cloned().collect();
        matched.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(matched)
    }

    fn for_product(&self, product_id: ProductId) -> Result<Vec<MovementRecord>, StoreError> {
        self.list(&MovementFilter {
            product_id: Some(product_id),
            ..MovementFilter::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use stockroom_core::{MovementId, UserId};

    fn record(movement_type: MovementType, product_id: ProductId, age_minutes: i64) -> MovementRecord {
        MovementRecord {
            id: MovementId::new(),
            product_id,
            movement_type,
            quantity: 1,
            reason: "test".to_string(),
            reference: None,
            notes: None,
            performed_by: UserId::new(),
            date: Utc::now() - Duration::minutes(age_minutes),
            previous_stock: 1,
            new_stock: if movement_type == MovementType::In { 2 } else { 0 },
        }
    }

    #[test]
    fn list_is_newest_first() {
        let store = InMemoryMovementStore::new();
        let product_id = ProductId::new();
        store.append(record(MovementType::In, product_id, 30)).unwrap();
        store.append(record(MovementType::Out, product_id, 5)).unwrap();

        let listed = store.list(&MovementFilter::default()).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].movement_type, MovementType::Out);
    }

    #[test]
    fn filter_by_type_and_product() {
        let store = InMemoryMovementStore::new();
        let a = ProductId::new();
        let b = ProductId::new();
        store.append(record(MovementType::In, a, 10)).unwrap();
        store.append(record(MovementType::Out, a, 9)).unwrap();
        store.append(record(MovementType::Out, b, 8)).unwrap();

        let outs = store
            .list(&MovementFilter {
                movement_type: Some(MovementType::Out),
                ..MovementFilter::default()
            })
            .unwrap();
        assert_eq!(outs.len(), 2);

        let for_a = store.for_product(a).unwrap();
        assert_eq!(for_a.len(), 2);
        assert!(for_a.iter().all(|r| r.product_id == a));
    }

    #[test]
    fn date_range_is_inclusive() {
        let store = InMemoryMovementStore::new();
        let product_id = ProductId::new();
        let r = record(MovementType::In, product_id, 0);
        let date = r.date;
        store.append(r).unwrap();

        let hit = store
            .list(&MovementFilter {
                from: Some(date),
                to: Some(date),
                ..MovementFilter::default()
            })
            .unwrap();
        assert_eq!(hit.len(), 1);

        let miss = store
            .list(&MovementFilter {
                from: Some(date + Duration::seconds(1)),
                ..MovementFilter::default()
            })
            .unwrap();
        assert!(miss.is_empty());
    }

    #[test]
    fn repeated_reads_are_identical() {
        let store = InMemoryMovementStore::new();
        let product_id = ProductId::new();
        store.append(record(MovementType::In, product_id, 3)).unwrap();
        store.append(record(MovementType::Out, product_id, 1)).unwrap();

        let first = store.list(&MovementFilter::default()).unwrap();
        let second = store.list(&MovementFilter::default()).unwrap();
        assert_eq!(first, second);
    }
}
