use std::sync::Arc;

use stockroom_auth::InMemoryUserDirectory;
use stockroom_infra::{
    CatalogService, InMemoryMovementStore, InMemoryProductStore, MovementService,
    ReportingService,
};

pub type Products = Arc<InMemoryProductStore>;
pub type Movements = Arc<InMemoryMovementStore>;
pub type Users = Arc<InMemoryUserDirectory>;

/// Application services shared by all handlers.
///
/// The catalog, movement, and reporting services all sit on the same two
/// stores, so catalog reads always observe protocol writes.
pub struct AppServices {
    pub catalog: CatalogService<Products>,
    pub movements: MovementService<Products, Movements, Users>,
    pub reporting: ReportingService<Products, Movements>,
    pub users: Users,
}

/// In-memory infra wiring (dev/test): stores + services.
pub fn build_services() -> AppServices {
    let products: Products = Arc::new(InMemoryProductStore::new());
    let movements: Movements = Arc::new(InMemoryMovementStore::new());
    let users: Users = Arc::new(InMemoryUserDirectory::new());

    AppServices {
        catalog: CatalogService::new(products.clone()),
        movements: MovementService::new(products.clone(), movements.clone(), users.clone()),
        reporting: ReportingService::new(products, movements),
        users,
    }
}
