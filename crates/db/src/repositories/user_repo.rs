//! Repository for the `users` table.

use sqlx::PgExecutor;

use odyssey_core::types::DbId;

use crate::models::user::{CreateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, display_name, password_hash, role, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(
        exec: impl PgExecutor<'_>,
        input: &CreateUser,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, display_name, password_hash, role)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.display_name)
            .bind(&input.password_hash)
            .bind(input.role.as_str())
            .fetch_one(exec)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(
        exec: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(exec)
            .await
    }

    /// Find a user by username (case-sensitive).
    pub async fn find_by_username(
        exec: impl PgExecutor<'_>,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(exec)
            .await
    }

    /// List all users ordered by most recently created first.
    pub async fn list(exec: impl PgExecutor<'_>) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY created_at DESC");
        sqlx::query_as::<_, User>(&query).fetch_all(exec).await
    }

    /// Total number of user accounts. Used for the startup bootstrap check.
    pub async fn count(exec: impl PgExecutor<'_>) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(exec)
            .await
    }

    /// Student directory search for POC assignment: case-insensitive
    /// substring match on username, excluding the caller, capped at 12.
    pub async fn search_students(
        exec: impl PgExecutor<'_>,
        query: &str,
        exclude_id: DbId,
    ) -> Result<Vec<User>, sqlx::Error> {
        let sql = format!(
            "SELECT {COLUMNS} FROM users
             WHERE role = 'STUDENT'
               AND id <> $1
               AND username ILIKE '%' || $2 || '%'
             ORDER BY username ASC
             LIMIT 12"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(exclude_id)
            .bind(query)
            .fetch_all(exec)
            .await
    }

    /// Replace a user's password hash.
    pub async fn update_password(
        exec: impl PgExecutor<'_>,
        id: DbId,
        password_hash: &str,
    ) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("UPDATE users SET password_hash = $2, updated_at = now() WHERE id = $1")
                .bind(id)
                .bind(password_hash)
                .execute(exec)
                .await?;
        Ok(result.rows_affected())
    }

    /// Delete a user account. Returns the number of rows removed.
    pub async fn delete(exec: impl PgExecutor<'_>, id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(exec)
            .await?;
        Ok(result.rows_affected())
    }
}
