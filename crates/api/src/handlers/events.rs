//! Event lifecycle handlers: creation, listing, the event-level review
//! decision, and sub-event composition while the event is still pre-review.
//!
//! Every state transition locks the parent event row inside a transaction so
//! concurrent decisions serialize instead of racing, then re-derives the
//! stage from the decision fields before committing.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{Postgres, Transaction};

use odyssey_core::budget::{self, BudgetItem, BudgetPhoto, InflowItem};
use odyssey_core::capability::{authorize, can_view_event, Action};
use odyssey_core::error::CoreError;
use odyssey_core::poc::{self, PocStatus};
use odyssey_core::review;
use odyssey_core::roles::Role;
use odyssey_core::stage::{compute_stage, DecisionStatus, EventStage, StageTarget, MAX_SUB_EVENTS};
use odyssey_core::types::{DbId, Timestamp};
use odyssey_db::models::event::{CreateEvent, Event};
use odyssey_db::models::sub_event::{CreateSubEvent, SubEvent};
use odyssey_db::repositories::{ClubRepo, EventRepo, SubEventRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::sub_events::SubEventResponse;
use crate::middleware::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub id: DbId,
    pub student_id: DbId,
    pub title: String,
    pub description: String,
    pub stage: String,
    pub sa_status: String,
    pub sa_remark: Option<String>,
    pub faculty_status: String,
    pub faculty_remark: Option<String>,
    pub dean_status: String,
    pub dean_remark: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&Event> for EventResponse {
    fn from(event: &Event) -> Self {
        EventResponse {
            id: event.id,
            student_id: event.student_id,
            title: event.title.clone(),
            description: event.description.clone(),
            stage: event.stage.clone(),
            sa_status: event.sa_status.clone(),
            sa_remark: event.sa_remark.clone(),
            faculty_status: event.faculty_status.clone(),
            faculty_remark: event.faculty_remark.clone(),
            dean_status: event.dean_status.clone(),
            dean_remark: event.dean_remark.clone(),
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

/// An event together with its sub-events, for the detail view.
#[derive(Debug, Serialize)]
pub struct EventDetail {
    #[serde(flatten)]
    pub event: EventResponse,
    pub sub_events: Vec<SubEventResponse>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSubEventRequest {
    pub name: String,
    pub club_id: DbId,
    /// POC resolved by username; must be another student.
    pub poc_username: String,
    pub poc_phone: String,
    pub budget_head: Decimal,
    pub budget_items: Vec<BudgetItem>,
    #[serde(default)]
    pub inflow_items: Vec<InflowItem>,
    #[serde(default)]
    pub budget_photos: Vec<BudgetPhoto>,
}

#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: String,
    pub sub_events: Vec<CreateSubEventRequest>,
}

/// POST /events
pub async fn create_event(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateEventRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<EventDetail>>)> {
    authorize(&auth.actor(), &Action::CreateEvent)?;

    if body.title.trim().is_empty() {
        return Err(CoreError::Validation("Event title is required".into()).into());
    }
    if body.sub_events.is_empty() {
        return Err(CoreError::Validation("An event needs at least one sub-event".into()).into());
    }
    if body.sub_events.len() > MAX_SUB_EVENTS {
        return Err(CoreError::Validation(format!(
            "An event may have at most {MAX_SUB_EVENTS} sub-events"
        ))
        .into());
    }

    let mut tx = state.pool.begin().await?;

    let event = EventRepo::create(
        &mut *tx,
        &CreateEvent {
            student_id: auth.user_id,
            title: body.title.trim().to_string(),
            description: body.description.trim().to_string(),
        },
    )
    .await?;

    let mut sub_events = Vec::with_capacity(body.sub_events.len());
    for request in &body.sub_events {
        let input = resolve_sub_event(&mut tx, auth.user_id, event.id, request).await?;
        let created = SubEventRepo::create(&mut *tx, &input).await?;
        sub_events.push(SubEventResponse::from(&created));
    }

    tx.commit().await?;

    tracing::info!(
        event_id = event.id,
        student_id = auth.user_id,
        sub_events = sub_events.len(),
        "Event created"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: EventDetail {
                event: EventResponse::from(&event),
                sub_events,
            },
        }),
    ))
}

/// GET /events/my
pub async fn my_events(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<EventResponse>>>> {
    let events = EventRepo::list_for_student(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: events.iter().map(EventResponse::from).collect(),
    }))
}

/// GET /events/review-queue
///
/// Every event currently sitting at the caller's gate.
pub async fn review_queue(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<EventResponse>>>> {
    authorize(&auth.actor(), &Action::ListReviewQueue)?;
    let target = reviewer_target(auth.role)?;

    let events = EventRepo::list_by_stage(&state.pool, target.review_stage()).await?;
    Ok(Json(DataResponse {
        data: events.iter().map(EventResponse::from).collect(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// `ASC` or `DESC` by last update; defaults to `DESC`.
    pub sort: Option<String>,
    /// Restrict to events with at least one sub-event under this club.
    pub club_id: Option<DbId>,
}

/// GET /events/history
///
/// Events the caller's gate has already decided.
pub async fn history(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<DataResponse<Vec<EventResponse>>>> {
    authorize(&auth.actor(), &Action::ListHistory)?;
    let target = reviewer_target(auth.role)?;

    let descending = !query
        .sort
        .as_deref()
        .is_some_and(|s| s.eq_ignore_ascii_case("asc"));

    let events = EventRepo::list_history(&state.pool, target, descending, query.club_id).await?;
    Ok(Json(DataResponse {
        data: events.iter().map(EventResponse::from).collect(),
    }))
}

/// GET /events/{id}
pub async fn get_event(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<EventDetail>>> {
    let event = EventRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "event", id })?;
    let sub_events = SubEventRepo::list_for_event(&state.pool, id).await?;

    let is_poc = sub_events.iter().any(|s| s.poc_id == auth.user_id);
    let decision_for_role = auth
        .role
        .review_target()
        .map(|t| event.decision(t))
        .transpose()?;

    if !can_view_event(
        &auth.actor(),
        event.student_id,
        is_poc,
        event.stage()?,
        decision_for_role,
    ) {
        return Err(CoreError::Forbidden("You do not have access to this event".into()).into());
    }

    Ok(Json(DataResponse {
        data: EventDetail {
            event: EventResponse::from(&event),
            sub_events: sub_events.iter().map(SubEventResponse::from).collect(),
        },
    }))
}

#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    pub approve: bool,
    #[serde(default)]
    pub remark: Option<String>,
}

/// POST /events/{id}/decision
///
/// The event-level decision for the caller's gate. Accepted only while the
/// event sits at that gate and every sub-event already carries the gate's
/// decision.
pub async fn decide(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(body): Json<DecisionRequest>,
) -> AppResult<Json<DataResponse<EventResponse>>> {
    let target = reviewer_target(auth.role)?;
    authorize(&auth.actor(), &Action::ReviewDecision { target })?;

    let mut tx = state.pool.begin().await?;

    let event = EventRepo::lock_by_id(&mut *tx, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "event", id })?;

    review::ensure_gate_open(target, event.stage()?)?;

    let sub_events = SubEventRepo::list_for_event(&mut *tx, id).await?;
    let statuses: Vec<DecisionStatus> = sub_events
        .iter()
        .map(|s| s.decision(target))
        .collect::<Result<_, _>>()?;
    review::ensure_all_sub_events_decided(target, &statuses)?;

    let status = review::validate_decision(event.decision(target)?, body.approve, body.remark.as_deref())?;

    let (sa, faculty, dean) = decisions_after(&event, target, status)?;
    let poc_complete = poc::all_accepted(&poc_statuses(&sub_events)?);
    let stage = compute_stage(poc_complete, sa, faculty, dean);

    let updated =
        EventRepo::update_decision(&mut *tx, id, target, status, body.remark.as_deref(), stage)
            .await?;

    tx.commit().await?;

    tracing::info!(
        event_id = id,
        reviewer_id = auth.user_id,
        gate = %target,
        status = %status,
        stage = %stage,
        "Event decision recorded"
    );

    Ok(Json(DataResponse {
        data: EventResponse::from(&updated),
    }))
}

/// POST /events/{id}/sub-events
///
/// Allowed only while the event is still in PENDING_POC.
pub async fn add_sub_event(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(event_id): Path<DbId>,
    Json(body): Json<CreateSubEventRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<SubEventResponse>>)> {
    let mut tx = state.pool.begin().await?;

    let event = EventRepo::lock_by_id(&mut *tx, event_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "event",
            id: event_id,
        })?;

    authorize(
        &auth.actor(),
        &Action::ModifySubEvents {
            owner_id: event.student_id,
        },
    )?;
    ensure_pre_review(&event)?;

    let existing = SubEventRepo::list_for_event(&mut *tx, event_id).await?;
    if existing.len() >= MAX_SUB_EVENTS {
        return Err(CoreError::Validation(format!(
            "An event may have at most {MAX_SUB_EVENTS} sub-events"
        ))
        .into());
    }

    let input = resolve_sub_event(&mut tx, auth.user_id, event_id, &body).await?;
    let created = SubEventRepo::create(&mut *tx, &input).await?;

    tx.commit().await?;

    tracing::info!(event_id, sub_event_id = created.id, "Sub-event added");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: SubEventResponse::from(&created),
        }),
    ))
}

/// DELETE /events/{id}/sub-events/{sub_event_id}
///
/// Removal is the recovery path for a POC decline, so the removal of the
/// last blocking sub-event may complete the gate and move the event into
/// SA review.
pub async fn remove_sub_event(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((event_id, sub_event_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<EventResponse>>> {
    let mut tx = state.pool.begin().await?;

    let event = EventRepo::lock_by_id(&mut *tx, event_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "event",
            id: event_id,
        })?;

    authorize(
        &auth.actor(),
        &Action::ModifySubEvents {
            owner_id: event.student_id,
        },
    )?;
    ensure_pre_review(&event)?;

    let sub_events = SubEventRepo::list_for_event(&mut *tx, event_id).await?;
    if !sub_events.iter().any(|s| s.id == sub_event_id) {
        return Err(CoreError::NotFound {
            entity: "sub-event",
            id: sub_event_id,
        }
        .into());
    }
    if sub_events.len() == 1 {
        return Err(CoreError::Validation("An event needs at least one sub-event".into()).into());
    }

    SubEventRepo::delete(&mut *tx, sub_event_id).await?;
    let updated = refresh_stage(&mut tx, &event).await?;

    tx.commit().await?;

    tracing::info!(event_id, sub_event_id, "Sub-event removed");

    Ok(Json(DataResponse {
        data: EventResponse::from(&updated),
    }))
}

/// The gate owned by the caller's role, or Forbidden for non-reviewers.
pub(crate) fn reviewer_target(role: Role) -> Result<StageTarget, CoreError> {
    role.review_target().ok_or_else(|| {
        CoreError::Forbidden(format!("Role {role} does not own a review gate"))
    })
}

/// Sub-event composition is frozen from the moment review begins.
fn ensure_pre_review(event: &Event) -> Result<(), CoreError> {
    if event.stage()? != EventStage::PendingPoc {
        return Err(CoreError::InvalidState(
            "Sub-events can only be changed before review begins".into(),
        ));
    }
    Ok(())
}

/// The three gate decisions with `target` replaced by `status`.
pub(crate) fn decisions_after(
    event: &Event,
    target: StageTarget,
    status: DecisionStatus,
) -> Result<(DecisionStatus, DecisionStatus, DecisionStatus), CoreError> {
    let mut sa = event.decision(StageTarget::Sa)?;
    let mut faculty = event.decision(StageTarget::Faculty)?;
    let mut dean = event.decision(StageTarget::Dean)?;
    match target {
        StageTarget::Sa => sa = status,
        StageTarget::Faculty => faculty = status,
        StageTarget::Dean => dean = status,
    }
    Ok((sa, faculty, dean))
}

pub(crate) fn poc_statuses(sub_events: &[SubEvent]) -> Result<Vec<PocStatus>, CoreError> {
    sub_events.iter().map(SubEvent::poc_status).collect()
}

/// Re-derive the stage from the current decisions and POC gate, persisting it
/// only when it actually moved. Must run inside the event's lock.
pub(crate) async fn refresh_stage(
    tx: &mut Transaction<'_, Postgres>,
    event: &Event,
) -> Result<Event, AppError> {
    let sub_events = SubEventRepo::list_for_event(&mut **tx, event.id).await?;
    let poc_complete = poc::all_accepted(&poc_statuses(&sub_events)?);
    let stage = compute_stage(
        poc_complete,
        event.decision(StageTarget::Sa)?,
        event.decision(StageTarget::Faculty)?,
        event.decision(StageTarget::Dean)?,
    );

    if stage.as_str() == event.stage {
        return Ok(event.clone());
    }
    Ok(EventRepo::update_stage(&mut **tx, event.id, stage).await?)
}

/// Validate one sub-event request and resolve its POC and club references.
pub(crate) async fn resolve_sub_event(
    tx: &mut Transaction<'_, Postgres>,
    creator_id: DbId,
    event_id: DbId,
    request: &CreateSubEventRequest,
) -> Result<CreateSubEvent, AppError> {
    if request.name.trim().is_empty() {
        return Err(CoreError::Validation("Each sub-event needs a name".into()).into());
    }

    let poc = UserRepo::find_by_username(&mut **tx, &request.poc_username)
        .await?
        .ok_or_else(|| {
            CoreError::Validation(format!("No user named {} exists", request.poc_username))
        })?;
    if poc.role()? != Role::Student {
        return Err(CoreError::Validation("The POC must be a student".into()).into());
    }
    if poc.id == creator_id {
        return Err(
            CoreError::Validation("You cannot be the POC of your own sub-event".into()).into(),
        );
    }

    ClubRepo::find_by_id(&mut **tx, request.club_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "club",
            id: request.club_id,
        })?;

    budget::validate_breakdown(request.budget_head, &request.budget_items)?;
    budget::validate_inflows(&request.inflow_items)?;
    budget::validate_photos(&request.budget_photos)?;

    Ok(CreateSubEvent {
        event_id,
        name: request.name.trim().to_string(),
        club_id: request.club_id,
        poc_id: poc.id,
        poc_name: poc.display_name.clone(),
        poc_phone: request.poc_phone.trim().to_string(),
        budget_head: budget::round2(request.budget_head),
        budget_items: request.budget_items.clone(),
        inflow_items: request.inflow_items.clone(),
        budget_photos: request.budget_photos.clone(),
    })
}
