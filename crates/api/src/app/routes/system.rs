use std::sync::Arc;

use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, sse::Event as SseEvent},
};

use crate::app::services::{self, AppServices};
use crate::context::OperatorContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(operator): Extension<OperatorContext>,
) -> impl IntoResponse {
    Json(serde_json::json!({
        "email": operator.email(),
        "language": services.dashboard().language(),
    }))
}

pub async fn stream(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Sse<impl tokio_stream::Stream<Item = Result<SseEvent, std::convert::Infallible>>> {
    services::notification_sse_stream(services)
}

/// Header counters for the review queue.
pub async fn dashboard(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    Json(services.dashboard().stats())
}

pub async fn notifications(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    Json(serde_json::json!({ "items": services.dashboard().notifications().recent() }))
}
