//! Bearer-token authentication extractor.
//!
//! Handlers take an [`AuthUser`] argument to require authentication. The
//! extractor validates the JWT and resolves the role claim; all further
//! permission decisions go through `odyssey_core::capability::authorize`.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::header;
use axum::http::request::Parts;

use odyssey_core::capability::Actor;
use odyssey_core::error::CoreError;
use odyssey_core::roles::Role;
use odyssey_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// The authenticated caller, extracted from the `Authorization` header.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: DbId,
    pub role: Role,
}

impl AuthUser {
    /// The caller as a capability-check actor.
    pub fn actor(&self) -> Actor {
        Actor {
            user_id: self.user_id,
            role: self.role,
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| CoreError::Unauthorized("Missing Authorization header".into()))?;

        let token = header_value.strip_prefix("Bearer ").ok_or_else(|| {
            CoreError::Unauthorized("Authorization header must carry a Bearer token".into())
        })?;

        let claims = validate_token(token, &state.config.jwt)
            .map_err(|_| CoreError::Unauthorized("Invalid or expired token".into()))?;

        let role: Role = claims
            .role
            .parse()
            .map_err(|_| CoreError::Unauthorized("Token carries an unknown role".into()))?;

        Ok(AuthUser {
            user_id: claims.sub,
            role,
        })
    }
}
