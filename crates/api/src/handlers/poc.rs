//! The POC confirmation gate: the pending-request inbox and the one-shot
//! accept/decline decision.

use axum::extract::{Path, State};
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use odyssey_core::budget::{self, BudgetItem};
use odyssey_core::capability::{authorize, Action};
use odyssey_core::error::CoreError;
use odyssey_core::poc;
use odyssey_core::types::{DbId, Timestamp};
use odyssey_db::models::sub_event::PendingPocRequest;
use odyssey_db::repositories::{EventRepo, SubEventRepo};

use crate::error::AppResult;
use crate::handlers::events::refresh_stage;
use crate::handlers::sub_events::SubEventResponse;
use crate::middleware::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// A pending confirmation request as shown in the POC's inbox.
#[derive(Debug, Serialize)]
pub struct PocRequestResponse {
    pub id: DbId,
    pub event_id: DbId,
    pub name: String,
    pub club_id: DbId,
    pub budget_head: Decimal,
    pub budget_items: Vec<BudgetItem>,
    pub event_title: String,
    pub event_description: String,
    pub student_name: String,
    pub created_at: Timestamp,
}

impl From<&PendingPocRequest> for PocRequestResponse {
    fn from(row: &PendingPocRequest) -> Self {
        PocRequestResponse {
            id: row.id,
            event_id: row.event_id,
            name: row.name.clone(),
            club_id: row.club_id,
            budget_head: row.budget_head,
            budget_items: row.budget_items.0.clone(),
            event_title: row.event_title.clone(),
            event_description: row.event_description.clone(),
            student_name: row.student_name.clone(),
            created_at: row.created_at,
        }
    }
}

/// GET /poc/requests
pub async fn my_requests(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<PocRequestResponse>>>> {
    let rows = SubEventRepo::list_pending_for_poc(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: rows.iter().map(PocRequestResponse::from).collect(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct PocDecisionRequest {
    pub accept: bool,
    /// Finalized budget head; defaults to the stored value when omitted.
    #[serde(default)]
    pub budget_head: Option<Decimal>,
    /// Finalized breakdown; defaults to the stored items when omitted.
    #[serde(default)]
    pub budget_items: Option<Vec<BudgetItem>>,
}

/// POST /poc/requests/{id}/decision
///
/// Acceptance finalizes the budget and may complete the gate, moving the
/// parent event into SA review. A decline is terminal for the sub-event;
/// the student recovers by removing it.
pub async fn decide(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(body): Json<PocDecisionRequest>,
) -> AppResult<Json<DataResponse<SubEventResponse>>> {
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

    authorize(&auth.actor(), &Action::PocDecision { poc_id: sub.poc_id })?;
    poc::ensure_pending(sub.poc_status()?)?;

    let updated = if body.accept {
        let head = body.budget_head.unwrap_or(sub.budget_head);
        let items = body
            .budget_items
            .clone()
            .unwrap_or_else(|| sub.budget_items.0.clone());
        budget::validate_breakdown(head, &items)?;
        SubEventRepo::accept(&mut *tx, id, budget::round2(head), &items).await?
    } else {
        SubEventRepo::decline(&mut *tx, id).await?
    };

    refresh_stage(&mut tx, &event).await?;

    tx.commit().await?;

    tracing::info!(
        sub_event_id = id,
        event_id = event.id,
        poc_id = auth.user_id,
        accepted = body.accept,
        "POC decision recorded"
    );

    Ok(Json(DataResponse {
        data: SubEventResponse::from(&updated),
    }))
}
