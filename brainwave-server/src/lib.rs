//! The Brainwave HTTP API: accounts, thoughts, and thought search.

pub mod auth;
pub mod config;
pub mod entities;
pub mod migrations;
pub mod observability;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::{Router, http::HeaderValue, routing::get};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, CorsLayer},
    trace::TraceLayer,
};

pub use config::AppConfig;
pub use state::AppState;

/// The complete application: routes, OpenAPI document, CORS, and request tracing.
pub fn build_app(state: AppState) -> Router {
    let cors = match state.config.cors_origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(AllowMethods::mirror_request())
            .allow_headers(AllowHeaders::mirror_request()),
        Err(_) => {
            tracing::warn!(origin = %state.config.cors_origin, "Ignoring unparseable CORS origin");
            CorsLayer::new()
        }
    };

    routes::router()
        .route("/openapi.json", get(openapi::openapi_json))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
