//! User entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use odyssey_core::error::CoreError;
use odyssey_core::roles::Role;
use odyssey_core::types::{DbId, Timestamp};

/// Full user row from the `users` table.
///
/// Contains the password hash -- never serialize this to API responses.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub display_name: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Parse the stored role column. A failure here means corrupt data, not
    /// bad input, so it surfaces as an internal error.
    pub fn role(&self) -> Result<Role, CoreError> {
        self.role
            .parse()
            .map_err(|_| CoreError::Internal(format!("User {} has invalid role", self.id)))
    }
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub username: String,
    pub display_name: String,
    pub role: String,
    pub created_at: Timestamp,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        UserResponse {
            id: user.id,
            username: user.username.clone(),
            display_name: user.display_name.clone(),
            role: user.role.clone(),
            created_at: user.created_at,
        }
    }
}

/// DTO for creating a new user.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub display_name: String,
    pub password_hash: String,
    pub role: Role,
}
