//! Storage traits and in-memory implementations.

pub mod movements;
pub mod products;

use thiserror::Error;

pub use movements::{InMemoryMovementStore, MovementFilter, MovementStore};
pub use products::{InMemoryProductStore, ProductStore};

/// Persistence-layer failure.
///
/// A `Timeout` must surface to the caller as a distinct failure; the
/// protocol never retries silently. `Inconsistent` marks a partial write
/// (e.g. a ledger entry without its product update) and is always reported.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store timed out: {0}")]
    Timeout(String),

    #[error("store state inconsistent: {0}")]
    Inconsistent(String),
}

impl StoreError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn inconsistent(msg: impl Into<String>) -> Self {
        Self::Inconsistent(msg.into())
    }
}
