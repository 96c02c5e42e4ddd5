//! After-event reconciliation, recorded per sub-event once the parent event
//! is approved. Each save replaces the previous record wholesale.

use axum::extract::{Path, State};
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;

use odyssey_core::after_event::{
    validate_after_event, AfterEventBudgetStatus, AfterEventImage, AfterEventItem,
};
use odyssey_core::capability::{authorize, Action};
use odyssey_core::error::CoreError;
use odyssey_core::stage::EventStage;
use odyssey_core::types::DbId;
use odyssey_db::models::sub_event::AfterEventRecord;
use odyssey_db::repositories::{EventRepo, SubEventRepo};

use crate::error::AppResult;
use crate::handlers::sub_events::SubEventResponse;
use crate::middleware::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AfterEventRequest {
    pub items: Vec<AfterEventItem>,
    #[serde(default)]
    pub images: Vec<AfterEventImage>,
    #[serde(default)]
    pub budget_status: Option<AfterEventBudgetStatus>,
    #[serde(default)]
    pub budget_delta: Option<Decimal>,
}

/// PUT /sub-events/{id}/after-event
pub async fn save(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(body): Json<AfterEventRequest>,
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

    authorize(
        &auth.actor(),
        &Action::SaveAfterEvent {
            owner_id: event.student_id,
        },
    )?;

    if event.stage()? != EventStage::Approved {
        return Err(CoreError::InvalidState(
            "After-event details can only be recorded once the event is approved".into(),
        )
        .into());
    }

    let budget_delta = validate_after_event(&body.items, body.budget_status, body.budget_delta)?;

    let updated = SubEventRepo::save_after_event(
        &mut *tx,
        id,
        &AfterEventRecord {
            items: body.items,
            images: body.images,
            budget_status: body.budget_status,
            budget_delta,
        },
    )
    .await?;

    tx.commit().await?;

    tracing::info!(
        sub_event_id = id,
        event_id = event.id,
        student_id = auth.user_id,
        "After-event record saved"
    );

    Ok(Json(DataResponse {
        data: SubEventResponse::from(&updated),
    }))
}
