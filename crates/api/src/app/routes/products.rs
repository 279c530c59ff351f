use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use databox_catalog::{ProductFilter, ProductPatch, ViewMode};
use databox_core::ProductId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products))
        .route("/:id", get(get_product).patch(edit_product))
        .route("/:id/enrich", post(enrich_product))
        .route("/:id/approve", post(approve_product))
        .route("/:id/reject", post(reject_product))
        .route("/:id/reset", post(reset_product))
}

fn parse_id(id: &str) -> Result<ProductId, axum::response::Response> {
    id.parse()
        .map_err(|_| errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id"))
}

fn product_json(services: &AppServices, product: &databox_catalog::Product) -> serde_json::Value {
    dto::product_to_json(product, services.dashboard().config().rounding_rule)
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ListProductsQuery>,
) -> axum::response::Response {
    let view: ViewMode = match query.view.as_deref().unwrap_or("all").parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    let filter = ProductFilter::new(query.q.unwrap_or_default(), view);

    let rule = services.dashboard().config().rounding_rule;
    let items = services
        .dashboard()
        .products(&filter)
        .iter()
        .map(|p| dto::product_to_json(p, rule))
        .collect::<Vec<_>>();
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.dashboard().product(&id) {
        Some(p) => (StatusCode::OK, Json(product_json(&services, &p))).into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "product not found"),
    }
}

/// Manual edit of title, prices or stock.
pub async fn edit_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(patch): Json<ProductPatch>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.dashboard().edit(&id, &patch) {
        Ok(p) => (StatusCode::OK, Json(product_json(&services, &p))).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

/// Start AI enrichment.
///
/// Answers `202 Accepted` with the product in `generating`; the result is
/// applied in the background. With `?wait=true` the response carries the
/// final state.
pub async fn enrich_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Query(query): Query<dto::EnrichQuery>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let pending = match services.dashboard().begin_enrichment(&id) {
        Ok(p) => p,
        Err(e) => return errors::catalog_error_to_response(e),
    };

    if query.wait {
        if let Err(e) = services.dashboard().finish_enrichment(pending).await {
            return errors::catalog_error_to_response(e);
        }
        return match services.dashboard().product(&id) {
            Some(p) => (StatusCode::OK, Json(product_json(&services, &p))).into_response(),
            None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "product not found"),
        };
    }

    let dashboard = services.dashboard().clone();
    tokio::spawn(async move {
        if let Err(e) = dashboard.finish_enrichment(pending).await {
            tracing::debug!(error = %e, "background enrichment dropped");
        }
    });

    match services.dashboard().product(&id) {
        Some(p) => (StatusCode::ACCEPTED, Json(product_json(&services, &p))).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

pub async fn approve_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let outcome = match services.dashboard().approve(&id) {
        Ok(o) => o,
        Err(e) => return errors::catalog_error_to_response(e),
    };
    let product = services
        .dashboard()
        .product(&id)
        .map(|p| product_json(&services, &p));
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "outcome": dto::approval_outcome_str(outcome),
            "product": product,
        })),
    )
        .into_response()
}

/// Remove the product from the queue. Answers with the removed record.
pub async fn reject_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.dashboard().reject(&id) {
        Ok(p) => (StatusCode::OK, Json(product_json(&services, &p))).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

/// Re-import: back to pending enrichment and draft.
pub async fn reset_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.dashboard().reset(&id) {
        Ok(p) => (StatusCode::OK, Json(product_json(&services, &p))).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}
