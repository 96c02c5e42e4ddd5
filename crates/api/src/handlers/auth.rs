//! Login, current-user lookup, and password changes.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use odyssey_core::error::CoreError;
use odyssey_db::models::user::UserResponse;
use odyssey_db::repositories::UserRepo;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Minimum accepted password length, for both account creation and changes.
pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    let user = UserRepo::find_by_username(&state.pool, &body.username)
        .await?
        .ok_or_else(|| CoreError::Unauthorized("Invalid username or password".into()))?;

    let valid = verify_password(&body.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {e}")))?;
    if !valid {
        return Err(CoreError::Unauthorized("Invalid username or password".into()).into());
    }

    let access_token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    tracing::info!(user_id = user.id, username = %user.username, "User logged in");

    Ok(Json(DataResponse {
        data: AuthResponse {
            access_token,
            expires_in: state.config.jwt.access_token_expiry_mins * 60,
            user: UserResponse::from(&user),
        },
    }))
}

/// GET /auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "user",
            id: auth.user_id,
        })?;

    Ok(Json(DataResponse {
        data: UserResponse::from(&user),
    }))
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct PasswordChanged {
    pub changed: bool,
}

/// PUT /auth/password
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<ChangePasswordRequest>,
) -> AppResult<Json<DataResponse<PasswordChanged>>> {
    if body.new_password.len() < MIN_PASSWORD_LEN {
        return Err(CoreError::Validation(format!(
            "New password must be at least {MIN_PASSWORD_LEN} characters"
        ))
        .into());
    }

    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "user",
            id: auth.user_id,
        })?;

    let valid = verify_password(&body.current_password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {e}")))?;
    if !valid {
        return Err(CoreError::Unauthorized("Current password is incorrect".into()).into());
    }

    let new_hash = hash_password(&body.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;
    UserRepo::update_password(&state.pool, user.id, &new_hash).await?;

    tracing::info!(user_id = user.id, "Password changed");

    Ok(Json(DataResponse {
        data: PasswordChanged { changed: true },
    }))
}
