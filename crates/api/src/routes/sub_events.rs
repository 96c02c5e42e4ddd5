use axum::routing::{post, put};
use axum::Router;

use crate::handlers::{after_event, sub_events};
use crate::state::AppState;

/// ```text
/// POST   /sub-events/{id}/decision       per-sub-event gate decision
/// PUT    /sub-events/{id}/after-event    after-event reconciliation
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sub-events/{id}/decision", post(sub_events::decide))
        .route("/sub-events/{id}/after-event", put(after_event::save))
}
