use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::events;
use crate::state::AppState;

/// ```text
/// POST   /events                                   create_event
/// GET    /events/my                                my_events
/// GET    /events/review-queue                      review_queue
/// GET    /events/history                           history
/// GET    /events/{id}                              get_event
/// POST   /events/{id}/decision                     decide
/// POST   /events/{id}/sub-events                   add_sub_event
/// DELETE /events/{id}/sub-events/{sub_event_id}    remove_sub_event
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events", post(events::create_event))
        .route("/events/my", get(events::my_events))
        .route("/events/review-queue", get(events::review_queue))
        .route("/events/history", get(events::history))
        .route("/events/{id}", get(events::get_event))
        .route("/events/{id}/decision", post(events::decide))
        .route("/events/{id}/sub-events", post(events::add_sub_event))
        .route(
            "/events/{id}/sub-events/{sub_event_id}",
            delete(events::remove_sub_event),
        )
}
