//! Event entity model and DTOs.

use serde::Deserialize;
use sqlx::FromRow;

use odyssey_core::error::CoreError;
use odyssey_core::stage::{DecisionStatus, EventStage, StageTarget};
use odyssey_core::types::{DbId, Timestamp};

/// A row from the `events` table. Stage and decision columns are TEXT; the
/// typed accessors below parse them into the domain enums.
#[derive(Debug, Clone, FromRow)]
pub struct Event {
    pub id: DbId,
    pub student_id: DbId,
    pub title: String,
    pub description: String,
    pub stage: String,
    pub sa_status: String,
    pub sa_remark: Option<String>,
    pub faculty_status: String,
    pub faculty_remark: Option<String>,
    pub dean_status: String,
    pub dean_remark: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Event {
    pub fn stage(&self) -> Result<EventStage, CoreError> {
        self.stage
            .parse()
            .map_err(|_| CoreError::Internal(format!("Event {} has invalid stage", self.id)))
    }

    /// The stored decision for one review gate.
    pub fn decision(&self, target: StageTarget) -> Result<DecisionStatus, CoreError> {
        let raw = match target {
            StageTarget::Sa => &self.sa_status,
            StageTarget::Faculty => &self.faculty_status,
            StageTarget::Dean => &self.dean_status,
        };
        raw.parse().map_err(|_| {
            CoreError::Internal(format!("Event {} has invalid {target} status", self.id))
        })
    }
}

/// DTO for inserting a new event. Decisions start PENDING and the stage
/// starts at PENDING_POC via column defaults.
#[derive(Debug, Deserialize)]
pub struct CreateEvent {
    pub student_id: DbId,
    pub title: String,
    pub description: String,
}
