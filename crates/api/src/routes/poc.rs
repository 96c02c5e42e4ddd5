use axum::routing::{get, post};
use axum::Router;

use crate::handlers::poc;
use crate::state::AppState;

/// ```text
/// GET    /poc/requests                   my_requests
/// POST   /poc/requests/{id}/decision     decide
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/poc/requests", get(poc::my_requests))
        .route("/poc/requests/{id}/decision", post(poc::decide))
}
