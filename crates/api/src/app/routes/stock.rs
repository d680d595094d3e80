use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use stockroom_infra::MovementFilter;
use stockroom_movements::{MovementRequest, MovementType};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::ActorContext;

pub fn router() -> Router {
    Router::new()
        .route("/in", post(stock_in))
        .route("/out", post(stock_out))
        .route("/damage", post(stock_damage))
        .route("/movements", post(create_movement).get(list_movements))
        .route("/movements/product/:id", get(product_history))
}

pub async fn stock_in(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Json(body): Json<dto::StockRequest>,
) -> axum::response::Response {
    apply(&services, actor, MovementType::In, body, "stock added successfully")
}

pub async fn stock_out(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Json(body): Json<dto::StockRequest>,
) -> axum::response::Response {
    apply(&services, actor, MovementType::Out, body, "stock removed successfully")
}

pub async fn stock_damage(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Json(body): Json<dto::StockRequest>,
) -> axum::response::Response {
    apply(&services, actor, MovementType::Damage, body, "damage reported successfully")
}

pub async fn create_movement(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Json(body): Json<dto::CreateMovementRequest>,
) -> axum::response::Response {
    let movement_type = match errors::parse_movement_type(&body.movement_type) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    apply(
        &services,
        actor,
        movement_type,
        dto::StockRequest {
            product_id: body.product_id,
            quantity: body.quantity,
            reason: body.reason,
            reference: body.reference,
            notes: body.notes,
        },
        "movement recorded successfully",
    )
}

fn apply(
    services: &AppServices,
    actor: ActorContext,
    movement_type: MovementType,
    body: dto::StockRequest,
    message: &str,
) -> axum::response::Response {
    let product_id = match errors::parse_product_id(&body.product_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let request = MovementRequest {
        product_id,
        movement_type,
        quantity: body.quantity,
        reason: body.reason,
        reference: body.reference,
        notes: body.notes,
        performed_by: actor.user_id(),
    };

    match services.movements.apply(request) {
        Ok(outcome) => (
            StatusCode::CREATED,
            Json(dto::outcome_to_json(message, &outcome)),
        )
            .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list_movements(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::MovementQuery>,
) -> axum::response::Response {
    let mut filter = MovementFilter {
        from: query.start_date,
        to: query.end_date,
        ..MovementFilter::default()
    };

    if let Some(ref s) = query.movement_type {
        match errors::parse_movement_type(s) {
            Ok(v) => filter.movement_type = Some(v),
            Err(resp) => return resp,
        }
    }
    if let Some(ref s) = query.product_id {
        match errors::parse_product_id(s) {
            Ok(v) => filter.product_id = Some(v),
            Err(resp) => return resp,
        }
    }

    match services.movements.list(&filter) {
        Ok(views) => {
            let body: Vec<_> = views.iter().map(dto::movement_view_to_json).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn product_history(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let product_id = match errors::parse_product_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.movements.history(product_id) {
        Ok(views) => {
            let body: Vec<_> = views.iter().map(dto::movement_view_to_json).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}
