use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use databox_catalog::AppConfig;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::OperatorContext;

pub async fn get_config(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    Json(services.dashboard().config())
}

/// Replace the operator's configuration. Margins are re-derived for every product.
pub async fn put_config(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(operator): Extension<OperatorContext>,
    Json(body): Json<AppConfig>,
) -> axum::response::Response {
    match services.save_config(operator.email(), body) {
        Ok(()) => (StatusCode::OK, Json(services.dashboard().config())).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn put_language(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LanguageRequest>,
) -> impl IntoResponse {
    services.dashboard().set_language(body.language);
    Json(serde_json::json!({ "language": body.language }))
}
