use axum::routing::get;
use axum::Router;

use crate::handlers::clubs;
use crate::state::AppState;

/// ```text
/// GET    /clubs    list
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/clubs", get(clubs::list))
}
