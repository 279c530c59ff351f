use axum::{
    Router,
    routing::{get, post, put},
};

pub mod auth;
pub mod config;
pub mod products;
pub mod system;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .route("/stream", get(system::stream))
        .route("/dashboard", get(system::dashboard))
        .route("/notifications", get(system::notifications))
        .route("/auth/logout", post(auth::logout))
        .route("/config", get(config::get_config).put(config::put_config))
        .route("/language", put(config::put_language))
        .nest("/products", products::router())
}
