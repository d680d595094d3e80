use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, MovementId, ProductId, UserId};

/// Kind of stock movement recorded in the ledger.
///
/// `Damage` is a write-off: it reduces on-hand stock exactly like `Out` and
/// accumulates into the same outbound counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    In,
    Out,
    Damage,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::In => "in",
            MovementType::Out => "out",
            MovementType::Damage => "damage",
        }
    }

    /// Whether this movement removes stock.
    pub fn is_outbound(&self) -> bool {
        matches!(self, MovementType::Out | MovementType::Damage)
    }

    /// Pure balance computation: the stock level after applying this movement.
    pub fn new_stock(&self, previous: i64, quantity: i64) -> i64 {
        match self {
            MovementType::In => previous + quantity,
            MovementType::Out | MovementType::Damage => previous - quantity,
        }
    }
}

impl core::fmt::Display for MovementType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovementType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "in" => Ok(MovementType::In),
            "out" => Ok(MovementType::Out),
            "damage" => Ok(MovementType::Damage),
            _ => Err(DomainError::validation(
                "movement type must be one of: in, out, damage",
            )),
        }
    }
}

/// A requested movement, before it has been applied.
///
/// `performed_by` is the authenticated principal; the protocol treats it as an
/// opaque required identifier. The movement date is never caller-supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementRequest {
    pub product_id: ProductId,
    pub movement_type: MovementType,
    pub quantity: i64,
    pub reason: String,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub performed_by: UserId,
}

impl MovementRequest {
    /// Deterministic input validation; checked before any state is touched.
    pub fn validate(&self) -> DomainResult<()> {
        if self.reason.trim().is_empty() {
            return Err(DomainError::validation("reason cannot be empty"));
        }
        if self.quantity < 1 {
            return Err(DomainError::validation("quantity must be at least 1"));
        }
        Ok(())
    }
}

/// One immutable ledger entry.
///
/// `previous_stock`/`new_stock` snapshot the product balance around the
/// movement, which makes the ledger self-auditing: a replay can verify the
/// running balance without consulting the live product row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementRecord {
    pub id: MovementId,
    pub product_id: ProductId,
    pub movement_type: MovementType,
    pub quantity: i64,
    pub reason: String,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub performed_by: UserId,
    pub date: DateTime<Utc>,
    pub previous_stock: i64,
    pub new_stock: i64,
}

impl MovementRecord {
    /// Snapshot equality: `new_stock == previous_stock ± quantity`.
    pub fn is_balanced(&self) -> bool {
        self.new_stock == self.movement_type.new_stock(self.previous_stock, self.quantity)
    }
}

/// Audit a product's ledger, oldest first: every record must balance and each
/// record's `previous_stock` must equal its predecessor's `new_stock`.
pub fn chain_is_consistent(records: &[MovementRecord]) -> bool {
    let mut carried: Option<i64> = None;
    for record in records {
        if !record.is_balanced() {
            return false;
        }
        if let Some(expected) = carried {
            if record.previous_stock != expected {
                return false;
            }
        }
        carried = Some(record.new_stock);
    }
    true
}
