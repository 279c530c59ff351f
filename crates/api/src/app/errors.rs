use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use databox_auth::AuthError;
use databox_catalog::{CatalogError, EnrichmentError};
use databox_core::DomainError;

use crate::app::services::ServiceError;

pub fn catalog_error_to_response(err: CatalogError) -> axum::response::Response {
    match err {
        CatalogError::NotFound(id) => {
            json_error(StatusCode::NOT_FOUND, "not_found", format!("product not found: {id}"))
        }
        e @ CatalogError::EnrichmentIncomplete { .. } => {
            json_error(StatusCode::CONFLICT, "enrichment_incomplete", e.to_string())
        }
        CatalogError::Duplicate(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        CatalogError::Enrichment(e @ EnrichmentError::MissingCredential) => {
            json_error(StatusCode::BAD_REQUEST, "missing_credential", e.to_string())
        }
        CatalogError::Enrichment(e @ EnrichmentError::GenerationFailure(_)) => {
            json_error(StatusCode::BAD_GATEWAY, "generation_failed", e.to_string())
        }
        CatalogError::Domain(e) => domain_error_to_response(e),
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        e @ DomainError::InvalidNumericInput { .. } => {
            json_error(StatusCode::BAD_REQUEST, "invalid_number", e.to_string())
        }
        DomainError::Validation(msg) | DomainError::InvalidId(msg) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
    }
}

pub fn auth_error_to_response(err: AuthError) -> axum::response::Response {
    match err {
        AuthError::InvalidCredentials => {
            json_error(StatusCode::UNAUTHORIZED, "invalid_credentials", "Invalid credentials")
        }
        AuthError::DuplicateUser(_) => {
            json_error(StatusCode::CONFLICT, "duplicate_user", "User already exists")
        }
        e @ AuthError::UnknownUser(_) => json_error(StatusCode::NOT_FOUND, "unknown_user", e.to_string()),
        AuthError::InvalidInput(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        e @ AuthError::Storage(_) => {
            tracing::error!(error = %e, "user store failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", e.to_string())
        }
    }
}

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::Auth(e) => auth_error_to_response(e),
        ServiceError::Catalog(e) => catalog_error_to_response(e),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
