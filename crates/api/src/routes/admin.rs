use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// ```text
/// GET    /admin/events                   list_events
/// POST   /admin/events/{id}/override     override_decision
/// GET    /admin/users                    list_users
/// POST   /admin/users                    create_user
/// DELETE /admin/users/{id}               delete_user
/// POST   /admin/clubs                    create_club
/// PUT    /admin/clubs/{id}               update_club
/// DELETE /admin/clubs/{id}               delete_club
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/events", get(admin::list_events))
        .route("/admin/events/{id}/override", post(admin::override_decision))
        .route(
            "/admin/users",
            get(admin::list_users).post(admin::create_user),
        )
        .route("/admin/users/{id}", delete(admin::delete_user))
        .route("/admin/clubs", post(admin::create_club))
        .route(
            "/admin/clubs/{id}",
            put(admin::update_club).delete(admin::delete_club),
        )
}
