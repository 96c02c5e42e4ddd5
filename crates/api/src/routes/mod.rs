pub mod admin;
pub mod auth;
pub mod clubs;
pub mod events;
pub mod health;
pub mod poc;
pub mod sub_events;
pub mod uploads;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      login (public)
/// /auth/me                                         current user
/// /auth/password                                   change password (PUT)
///
/// /events                                          create (POST, student)
/// /events/my                                       caller's own events
/// /events/review-queue                             events at the caller's gate
/// /events/history                                  events the caller's gate decided
/// /events/{id}                                     detail with sub-events
/// /events/{id}/decision                            event-level gate decision (POST)
/// /events/{id}/sub-events                          add sub-event (POST, pre-review)
/// /events/{id}/sub-events/{sub_event_id}           remove sub-event (DELETE, pre-review)
///
/// /sub-events/{id}/decision                        per-sub-event gate decision (POST)
/// /sub-events/{id}/after-event                     after-event record (PUT, owner)
///
/// /poc/requests                                    pending confirmations for the caller
/// /poc/requests/{id}/decision                      accept or decline (POST)
///
/// /clubs                                           club directory
/// /users/search                                    student search for POC assignment
/// /uploads                                         multipart file upload (POST)
///
/// /admin/events                                    all events (admin only)
/// /admin/events/{id}/override                      gate override (POST)
/// /admin/users                                     list, create
/// /admin/users/{id}                                delete
/// /admin/clubs                                     create
/// /admin/clubs/{id}                                update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(events::router())
        .merge(sub_events::router())
        .merge(poc::router())
        .merge(clubs::router())
        .merge(users::router())
        .merge(uploads::router())
        .merge(admin::router())
}
