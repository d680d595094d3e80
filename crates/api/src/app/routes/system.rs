use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use crate::app::services::AppServices;
use crate::context::ActorContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
) -> impl IntoResponse {
    use stockroom_auth::UserDirectory;

    let profile = services.users.get(actor.user_id());
    Json(serde_json::json!({
        "user_id": actor.user_id().to_string(),
        "name": profile.as_ref().map(|p| p.name.clone()),
        "email": profile.as_ref().map(|p| p.email.clone()),
    }))
}
