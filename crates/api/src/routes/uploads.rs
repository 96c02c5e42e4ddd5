use axum::routing::post;
use axum::Router;

use crate::handlers::uploads;
use crate::state::AppState;

/// ```text
/// POST   /uploads    upload
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/uploads", post(uploads::upload))
}
