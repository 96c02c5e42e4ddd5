//! Repository for the `clubs` table.

use sqlx::PgExecutor;

use odyssey_core::types::DbId;

use crate::models::club::Club;

const COLUMNS: &str = "id, name, created_at, updated_at";

/// Provides CRUD operations for clubs.
pub struct ClubRepo;

impl ClubRepo {
    pub async fn create(exec: impl PgExecutor<'_>, name: &str) -> Result<Club, sqlx::Error> {
        let query = format!("INSERT INTO clubs (name) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Club>(&query)
            .bind(name)
            .fetch_one(exec)
            .await
    }

    pub async fn find_by_id(
        exec: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Club>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clubs WHERE id = $1");
        sqlx::query_as::<_, Club>(&query)
            .bind(id)
            .fetch_optional(exec)
            .await
    }

    /// List all clubs, ordered by name ascending.
    pub async fn list_all(exec: impl PgExecutor<'_>) -> Result<Vec<Club>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clubs ORDER BY name ASC");
        sqlx::query_as::<_, Club>(&query).fetch_all(exec).await
    }

    /// Rename a club. Returns `None` if no row with the given id exists.
    pub async fn update(
        exec: impl PgExecutor<'_>,
        id: DbId,
        name: &str,
    ) -> Result<Option<Club>, sqlx::Error> {
        let query = format!(
            "UPDATE clubs SET name = $2, updated_at = now() WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Club>(&query)
            .bind(id)
            .bind(name)
            .fetch_optional(exec)
            .await
    }

    pub async fn delete(exec: impl PgExecutor<'_>, id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM clubs WHERE id = $1")
            .bind(id)
            .execute(exec)
            .await?;
        Ok(result.rows_affected())
    }
}
