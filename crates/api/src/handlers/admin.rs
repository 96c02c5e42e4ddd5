//! Administrative handlers: the decision override, the all-events dashboard,
//! and user/club management.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use odyssey_core::capability::{authorize, Action};
use odyssey_core::error::CoreError;
use odyssey_core::poc;
use odyssey_core::roles::Role;
use odyssey_core::stage::{compute_stage, DecisionStatus, StageTarget};
use odyssey_core::types::DbId;
use odyssey_db::models::club::Club;
use odyssey_db::models::user::{CreateUser, UserResponse};
use odyssey_db::repositories::{ClubRepo, EventRepo, SubEventRepo, UserRepo};

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::handlers::auth::MIN_PASSWORD_LEN;
use crate::handlers::events::{decisions_after, poc_statuses, EventResponse};
use crate::middleware::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct OverrideRequest {
    pub target: StageTarget,
    pub status: DecisionStatus,
    #[serde(default)]
    pub remark: Option<String>,
}

/// POST /admin/events/{id}/override
///
/// Sets one gate's decision directly, skipping the gate-open and
/// already-decided checks, then re-derives the stage from the overridden
/// decisions. Used to unstick an event or correct a wrong decision.
pub async fn override_decision(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(body): Json<OverrideRequest>,
) -> AppResult<Json<DataResponse<EventResponse>>> {
    authorize(&auth.actor(), &Action::Override)?;

    if body.status == DecisionStatus::Pending {
        return Err(
            CoreError::Validation("Override status must be APPROVED or REJECTED".into()).into(),
        );
    }
    if body.status == DecisionStatus::Rejected
        && !body.remark.as_deref().is_some_and(|r| !r.trim().is_empty())
    {
        return Err(CoreError::Validation("Rejections require a remark".into()).into());
    }

    let mut tx = state.pool.begin().await?;

    let event = EventRepo::lock_by_id(&mut *tx, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "event", id })?;

    let (sa, faculty, dean) = decisions_after(&event, body.target, body.status)?;
    let sub_events = SubEventRepo::list_for_event(&mut *tx, id).await?;
    let poc_complete = poc::all_accepted(&poc_statuses(&sub_events)?);
    let stage = compute_stage(poc_complete, sa, faculty, dean);

    let updated = EventRepo::update_decision(
        &mut *tx,
        id,
        body.target,
        body.status,
        body.remark.as_deref(),
        stage,
    )
    .await?;

    tx.commit().await?;

    tracing::warn!(
        event_id = id,
        admin_id = auth.user_id,
        gate = %body.target,
        status = %body.status,
        stage = %stage,
        "Admin override applied"
    );

    Ok(Json(DataResponse {
        data: EventResponse::from(&updated),
    }))
}

/// GET /admin/events
pub async fn list_events(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<EventResponse>>>> {
    authorize(&auth.actor(), &Action::ListAllEvents)?;

    let events = EventRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse {
        data: events.iter().map(EventResponse::from).collect(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub display_name: String,
    pub password: String,
    pub role: Role,
}

/// POST /admin/users
pub async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    authorize(&auth.actor(), &Action::ManageUsers)?;

    if body.username.trim().is_empty() {
        return Err(CoreError::Validation("Username is required".into()).into());
    }
    if body.display_name.trim().is_empty() {
        return Err(CoreError::Validation("Display name is required".into()).into());
    }
    if body.password.len() < MIN_PASSWORD_LEN {
        return Err(CoreError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        ))
        .into());
    }

    let password_hash = hash_password(&body.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: body.username.trim().to_string(),
            display_name: body.display_name.trim().to_string(),
            password_hash,
            role: body.role,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, role = %body.role, "User created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserResponse::from(&user),
        }),
    ))
}

/// GET /admin/users
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    authorize(&auth.actor(), &Action::ManageUsers)?;

    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(DataResponse {
        data: users.iter().map(UserResponse::from).collect(),
    }))
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub deleted: bool,
}

/// DELETE /admin/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Deleted>>> {
    authorize(&auth.actor(), &Action::ManageUsers)?;

    if id == auth.user_id {
        return Err(CoreError::Validation("You cannot delete your own account".into()).into());
    }

    let removed = UserRepo::delete(&state.pool, id).await?;
    if removed == 0 {
        return Err(CoreError::NotFound { entity: "user", id }.into());
    }

    tracing::info!(user_id = id, admin_id = auth.user_id, "User deleted");

    Ok(Json(DataResponse {
        data: Deleted { deleted: true },
    }))
}

#[derive(Debug, Deserialize)]
pub struct ClubRequest {
    pub name: String,
}

/// POST /admin/clubs
pub async fn create_club(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<ClubRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Club>>)> {
    authorize(&auth.actor(), &Action::ManageClubs)?;

    if body.name.trim().is_empty() {
        return Err(CoreError::Validation("Club name is required".into()).into());
    }

    let club = ClubRepo::create(&state.pool, body.name.trim()).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse { data: club }),
    ))
}

/// PUT /admin/clubs/{id}
pub async fn update_club(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(body): Json<ClubRequest>,
) -> AppResult<Json<DataResponse<Club>>> {
    authorize(&auth.actor(), &Action::ManageClubs)?;

    if body.name.trim().is_empty() {
        return Err(CoreError::Validation("Club name is required".into()).into());
    }

    let club = ClubRepo::update(&state.pool, id, body.name.trim())
        .await?
        .ok_or(CoreError::NotFound { entity: "club", id })?;

    Ok(Json(DataResponse { data: club }))
}

/// DELETE /admin/clubs/{id}
///
/// Refused while any sub-event still references the club.
pub async fn delete_club(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Deleted>>> {
    authorize(&auth.actor(), &Action::ManageClubs)?;

    if SubEventRepo::club_in_use(&state.pool, id).await? {
        return Err(CoreError::InvalidState(
            "This club is referenced by existing sub-events".into(),
        )
        .into());
    }

    let removed = ClubRepo::delete(&state.pool, id).await?;
    if removed == 0 {
        return Err(CoreError::NotFound { entity: "club", id }.into());
    }

    tracing::info!(club_id = id, admin_id = auth.user_id, "Club deleted");

    Ok(Json(DataResponse {
        data: Deleted { deleted: true },
    }))
}
