//! Club reference entity.

use serde::Serialize;
use sqlx::FromRow;

use odyssey_core::types::{DbId, Timestamp};

/// A row from the `clubs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Club {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
