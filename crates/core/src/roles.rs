//! User roles and their mapping onto the review pipeline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::stage::StageTarget;

/// Role assigned to every user account. Stored as TEXT in the `users` table
/// and carried in the JWT `role` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Student,
    SaOffice,
    FacultyCoordinator,
    Dean,
    Admin,
    Dev,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Student => "STUDENT",
            Role::SaOffice => "SA_OFFICE",
            Role::FacultyCoordinator => "FACULTY_COORDINATOR",
            Role::Dean => "DEAN",
            Role::Admin => "ADMIN",
            Role::Dev => "DEV",
        }
    }

    /// Admins and devs share the override authority.
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin | Role::Dev)
    }

    /// The review gate this role owns, if it is a reviewing role.
    pub fn review_target(self) -> Option<StageTarget> {
        match self {
            Role::SaOffice => Some(StageTarget::Sa),
            Role::FacultyCoordinator => Some(StageTarget::Faculty),
            Role::Dean => Some(StageTarget::Dean),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STUDENT" => Ok(Role::Student),
            "SA_OFFICE" => Ok(Role::SaOffice),
            "FACULTY_COORDINATOR" => Ok(Role::FacultyCoordinator),
            "DEAN" => Ok(Role::Dean),
            "ADMIN" => Ok(Role::Admin),
            "DEV" => Ok(Role::Dev),
            other => Err(CoreError::Validation(format!("Unknown role: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_strings() {
        for role in [
            Role::Student,
            Role::SaOffice,
            Role::FacultyCoordinator,
            Role::Dean,
            Role::Admin,
            Role::Dev,
        ] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!("REGISTRAR".parse::<Role>().is_err());
    }

    #[test]
    fn only_reviewing_roles_own_a_gate() {
        assert_eq!(Role::SaOffice.review_target(), Some(StageTarget::Sa));
        assert_eq!(
            Role::FacultyCoordinator.review_target(),
            Some(StageTarget::Faculty)
        );
        assert_eq!(Role::Dean.review_target(), Some(StageTarget::Dean));
        assert_eq!(Role::Student.review_target(), None);
        assert_eq!(Role::Admin.review_target(), None);
    }

    #[test]
    fn admin_and_dev_are_admins() {
        assert!(Role::Admin.is_admin());
        assert!(Role::Dev.is_admin());
        assert!(!Role::Dean.is_admin());
    }
}
