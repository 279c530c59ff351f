use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::OperatorContext;

/// Unauthenticated account routes.
pub fn public_router() -> Router {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CredentialsRequest>,
) -> axum::response::Response {
    match services.register(&body.email, &body.password) {
        Ok((token, user)) => {
            (StatusCode::CREATED, Json(dto::SessionResponse { token, user })).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CredentialsRequest>,
) -> axum::response::Response {
    match services.login(&body.email, &body.password) {
        Ok((token, user)) => (StatusCode::OK, Json(dto::SessionResponse { token, user })).into_response(),
        Err(e) => {
            tracing::warn!(email = %body.email, "login failed");
            errors::service_error_to_response(e)
        }
    }
}

pub async fn logout(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(operator): Extension<OperatorContext>,
) -> axum::response::Response {
    match services.logout(operator.email(), &operator.token()) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::auth_error_to_response(e),
    }
}
