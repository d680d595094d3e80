//! Application-level error type.
//!
//! Flattens domain and storage failures into one enum at the service
//! boundary, so callers (the HTTP layer) can map each taxonomy member to a
//! precise response without peeling nested errors.

use stockroom_core::DomainError;

use crate::store::StoreError;

#[derive(Debug)]
pub enum ServiceError {
    /// Deterministic input validation failure.
    Validation(String),
    /// An identifier failed to parse.
    InvalidId(String),
    /// Referenced record does not exist.
    NotFound,
    /// Outbound movement exceeds available stock.
    InsufficientStock { available: i64, requested: i64 },
    /// Duplicate SKU or comparable uniqueness clash.
    Conflict(String),
    /// Underlying persistence failure (including partial writes).
    Storage(StoreError),
}

impl From<DomainError> for ServiceError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => ServiceError::Validation(msg),
            DomainError::InvalidId(msg) => ServiceError::InvalidId(msg),
            DomainError::NotFound => ServiceError::NotFound,
            DomainError::Conflict(msg) => ServiceError::Conflict(msg),
            DomainError::InsufficientStock {
                available,
                requested,
            } => ServiceError::InsufficientStock {
                available,
                requested,
            },
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        ServiceError::Storage(value)
    }
}
