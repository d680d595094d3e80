use axum::{routing::get, Router};

pub mod dashboard;
pub mod products;
pub mod stock;
pub mod system;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/products", products::router())
        .nest("/stock", stock::router())
        .nest("/dashboard", dashboard::router())
}
