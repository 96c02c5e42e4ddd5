//! Club directory, readable by any authenticated user.

use axum::extract::State;
use axum::Json;

use odyssey_db::models::club::Club;
use odyssey_db::repositories::ClubRepo;

use crate::error::AppResult;
use crate::middleware::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /clubs
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Club>>>> {
    let clubs = ClubRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse { data: clubs }))
}
