//! Per-sub-event review decisions and the shared sub-event response shape.
//!
//! A reviewer resolves each sub-event individually before the event-level
//! decision is accepted. A rejected sub-event does not reject the event; the
//! event-level decision remains the reviewer's call.

use axum::extract::{Path, State};
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use odyssey_core::after_event::{AfterEventImage, AfterEventItem};
use odyssey_core::budget::{BudgetItem, BudgetPhoto, InflowItem};
use odyssey_core::capability::{authorize, Action};
use odyssey_core::error::CoreError;
use odyssey_core::review;
use odyssey_core::stage::DecisionStatus;
use odyssey_core::types::{DbId, Timestamp};
use odyssey_db::models::sub_event::SubEvent;
use odyssey_db::repositories::{EventRepo, SubEventRepo};

use crate::error::AppResult;
use crate::handlers::events::reviewer_target;
use crate::middleware::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SubEventResponse {
    pub id: DbId,
    pub event_id: DbId,
    pub name: String,
    pub club_id: DbId,
    pub poc_id: DbId,
    pub poc_name: String,
    pub poc_phone: String,
    pub poc_status: String,
    pub sa_status: String,
    pub faculty_status: String,
    pub dean_status: String,
    pub budget_head: Decimal,
    pub budget_items: Vec<BudgetItem>,
    pub inflow_items: Vec<InflowItem>,
    pub budget_photos: Vec<BudgetPhoto>,
    pub after_event_items: Vec<AfterEventItem>,
    pub after_event_images: Vec<AfterEventImage>,
    pub after_event_budget_status: Option<String>,
    pub after_event_budget_delta: Option<Decimal>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&SubEvent> for SubEventResponse {
    fn from(sub: &SubEvent) -> Self {
        SubEventResponse {
            id: sub.id,
            event_id: sub.event_id,
            name: sub.name.clone(),
            club_id: sub.club_id,
            poc_id: sub.poc_id,
            poc_name: sub.poc_name.clone(),
            poc_phone: sub.poc_phone.clone(),
            poc_status: sub.poc_status.clone(),
            sa_status: sub.sa_status.clone(),
            faculty_status: sub.faculty_status.clone(),
            dean_status: sub.dean_status.clone(),
            budget_head: sub.budget_head,
            budget_items: sub.budget_items.0.clone(),
            inflow_items: sub.inflow_items.0.clone(),
            budget_photos: sub.budget_photos.0.clone(),
            after_event_items: sub.after_event_items.0.clone(),
            after_event_images: sub.after_event_images.0.clone(),
            after_event_budget_status: sub.after_event_budget_status.clone(),
            after_event_budget_delta: sub.after_event_budget_delta,
            created_at: sub.created_at,
            updated_at: sub.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SubEventDecisionRequest {
    pub approve: bool,
}

/// POST /sub-events/{id}/decision
///
/// The caller's gate must be open on the parent event, and each sub-event
/// takes at most one decision per gate. No remark at this level; remarks
/// belong to the event-level decision.
pub async fn decide(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(body): Json<SubEventDecisionRequest>,
) -> AppResult<Json<DataResponse<SubEventResponse>>> {
    let target = reviewer_target(auth.role)?;
    authorize(&auth.actor(), &Action::ReviewDecision { target })?;

    let mut tx = state.pool.begin().await?;

    let sub = SubEventRepo::find_by_id(&mut *tx, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "sub-event",
            id,
        })?;
    let event = EventRepo::lock_by_id(&mut *tx, sub.event_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "event",
            id: sub.event_id,
        })?;
    // Re-read under the parent lock; the row may have changed while we waited.
    let sub = SubEventRepo::find_by_id(&mut *tx, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "sub-event",
            id,
        })?;

    review::ensure_gate_open(target, event.stage()?)?;

    let current = sub.decision(target)?;
    if current.is_decided() {
        return Err(CoreError::InvalidState(format!(
            "This sub-event was already {current} at the {target} gate"
        ))
        .into());
    }

    let status = if body.approve {
        DecisionStatus::Approved
    } else {
        DecisionStatus::Rejected
    };
    let updated = SubEventRepo::update_review_status(&mut *tx, id, target, status).await?;

    tx.commit().await?;

    tracing::info!(
        sub_event_id = id,
        event_id = event.id,
        reviewer_id = auth.user_id,
        gate = %target,
        status = %status,
        "Sub-event decision recorded"
    );

    Ok(Json(DataResponse {
        data: SubEventResponse::from(&updated),
    }))
}
