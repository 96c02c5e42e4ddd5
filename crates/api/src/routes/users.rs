use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// ```text
/// GET    /users/search?q=    search
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/users/search", get(users::search))
}
