//! Infrastructure layer: storage, per-product serialization, and the
//! application services that orchestrate the domain crates.

pub mod catalog_service;
pub mod error;
pub mod locks;
pub mod movement_service;
pub mod reporting;
pub mod store;

mod integration_tests;

pub use catalog_service::CatalogService;
pub use error::ServiceError;
pub use locks::ProductLockTable;
pub use movement_service::{
    MovementOutcome, MovementService, MovementView, ProductRef, ProductSummary,
};
pub use reporting::{
    DashboardStats, MovementTypeCounts, ReportingService, TopSku, TrendBucket,
};
pub use store::{
    InMemoryMovementStore, InMemoryProductStore, MovementFilter, MovementStore, ProductStore,
    StoreError,
};
