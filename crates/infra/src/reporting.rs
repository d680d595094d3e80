//! Dashboard reporting: read-only aggregations over the catalog and the
//! ledger. Derived views only; nothing here carries invariants of its own.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use stockroom_catalog::ProductStatus;
use stockroom_core::ProductId;
use stockroom_movements::MovementType;

use crate::error::ServiceError;
use crate::store::{MovementFilter, MovementStore, ProductStore};

/// All-time movement counts split by type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MovementTypeCounts {
    #[serde(rename = "in")]
    pub inbound: u64,
    pub out: u64,
    pub damage: u64,
}

/// Headline dashboard numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_products: u64,
    pub active_products: u64,
    pub low_stock_products: u64,
    /// Σ quantity × unit_price over active products.
    pub total_value: f64,
    /// Movements recorded in the last seven days.
    pub recent_movements: u64,
    pub movement_types: MovementTypeCounts,
}

/// One (day, movement type) bucket of the trend series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendBucket {
    /// Calendar day, `YYYY-MM-DD`.
    pub date: String,
    pub movement_type: MovementType,
    pub count: u64,
    pub total_quantity: i64,
}

/// An active product ranked by outbound volume.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopSku {
    pub product_id: ProductId,
    pub sku: String,
    pub name: String,
    pub total_quantity: i64,
    pub movements: u64,
}

#[derive(Debug)]
pub struct ReportingService<P, M> {
    products: P,
    movements: M,
}

impl<P, M> ReportingService<P, M>
where
    P: ProductStore,
    M: MovementStore,
{
    pub fn new(products: P, movements: M) -> Self {
        Self {
            products,
            movements,
        }
    }

    pub fn stats(&self, now: DateTime<Utc>) -> Result<DashboardStats, ServiceError> {
        let products = self.products.list()?;
        let movements = self.movements.list(&MovementFilter::default())?;

        let total_products = products.len() as u64;
        let active_products = products
            .iter()
            .filter(|p| p.status == ProductStatus::Active)
            .count() as u64;
        let low_stock_products = products.iter().filter(|p| p.is_low_stock()).count() as u64;
        let total_value = products
            .iter()
            .filter(|p| p.status == ProductStatus::Active)
            .map(|p| p.quantity as f64 * p.unit_price.unwrap_or(0.0))
            .sum();

        let week_ago = now - Duration::days(7);
        let recent_movements = movements.iter().filter(|m| m.date >= week_ago).count() as u64;

        let mut movement_types = MovementTypeCounts::default();
        for movement in &movements {
            match movement.movement_type {
                MovementType::In => movement_types.inbound += 1,
                MovementType::Out => movement_types.out += 1,
                MovementType::Damage => movement_types.damage += 1,
            }
        }

        Ok(DashboardStats {
            total_products,
            active_products,
            low_stock_products,
            total_value,
            recent_movements,
            movement_types,
        })
    }

    /// Movements of the last `days` days bucketed by (day, type), ascending
    /// by day.
    pub fn trends(&self, days: i64, now: DateTime<Utc>) -> Result<Vec<TrendBucket>, ServiceError> {
        let start = now - Duration::days(days);
        let movements = self.movements.list(&MovementFilter {
            from: Some(start),
            ..MovementFilter::default()
        })?;

        // BTreeMap keeps buckets ordered by (day, type).
        let mut buckets: std::collections::BTreeMap<(String, &'static str), (MovementType, u64, i64)> =
            std::collections::BTreeMap::new();
        for movement in movements {
            let day = movement.date.date_naive().to_string();
            let entry = buckets
                .entry((day, movement.movement_type.as_str()))
                .or_insert((movement.movement_type, 0, 0));
            entry.1 += 1;
            entry.2 += movement.quantity;
        }

        Ok(buckets
            .into_iter()
            .map(|((date, _), (movement_type, count, total_quantity))| TrendBucket {
                date,
                movement_type,
                count,
                total_quantity,
            })
            .collect())
    }

    /// Active products ranked by summed `out` quantity, descending.
    pub fn top_skus(&self, limit: usize) -> Result<Vec<TopSku>, ServiceError> {
        let movements = self.movements.list(&MovementFilter {
            movement_type: Some(MovementType::Out),
            ..MovementFilter::default()
        })?;

        let mut totals: HashMap<ProductId, (i64, u64)> = HashMap::new();
        for movement in movements {
            let entry = totals.entry(movement.product_id).or_insert((0, 0));
            entry.0 += movement.quantity;
            entry.1 += 1;
        }

        let mut ranked: Vec<TopSku> = self
            .products
            .list()?
            .into_iter()
            .filter(|p| p.status == ProductStatus::Active)
            .filter_map(|p| {
                totals.get(&p.id).map(|(total_quantity, movements)| TopSku {
                    product_id: p.id,
                    sku: p.sku,
                    name: p.name,
                    total_quantity: *total_quantity,
                    movements: *movements,
                })
            })
            .collect();
        ranked.sort_by(|a, b| b.total_quantity.cmp(&a.total_quantity));
        ranked.truncate(limit);
        Ok(ranked)
    }
}
