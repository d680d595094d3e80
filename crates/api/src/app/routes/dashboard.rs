use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Utc;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/stats", get(stats))
        .route("/trends", get(trends))
        .route("/top-skus", get(top_skus))
}

pub async fn stats(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.reporting.stats(Utc::now()) {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn trends(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::TrendsQuery>,
) -> axum::response::Response {
    let days = query.days.unwrap_or(7).max(1);

    match services.reporting.trends(days, Utc::now()) {
        Ok(buckets) => (StatusCode::OK, Json(buckets)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn top_skus(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::TopSkusQuery>,
) -> axum::response::Response {
    let limit = query.limit.unwrap_or(5);

    match services.reporting.top_skus(limit) {
        Ok(ranked) => (StatusCode::OK, Json(ranked)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
