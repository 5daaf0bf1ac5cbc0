pub mod auth;
pub mod health;
pub mod thoughts;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Every API route, without middleware.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health::index))
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        .route("/thoughts", get(thoughts::search).post(thoughts::create))
        .route(
            "/thoughts/{id}",
            get(thoughts::get_one)
                .patch(thoughts::update)
                .delete(thoughts::delete),
        )
}
