//! Student directory search, used by event creators to pick a POC.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use odyssey_core::capability::{authorize, Action};
use odyssey_db::models::user::UserResponse;
use odyssey_db::repositories::UserRepo;

use crate::error::AppResult;
use crate::middleware::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Queries shorter than this return an empty result instead of an error.
const MIN_QUERY_LEN: usize = 2;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// GET /users/search?q=
pub async fn search(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    authorize(&auth.actor(), &Action::SearchUsers)?;

    let needle = query.q.trim();
    if needle.len() < MIN_QUERY_LEN {
        return Ok(Json(DataResponse { data: Vec::new() }));
    }

    let users = UserRepo::search_students(&state.pool, needle, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: users.iter().map(UserResponse::from).collect(),
    }))
}
