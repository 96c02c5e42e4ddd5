//! Sub-event entity model and DTOs.

use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::FromRow;

use odyssey_core::after_event::{AfterEventBudgetStatus, AfterEventImage, AfterEventItem};
use odyssey_core::budget::{BudgetItem, BudgetPhoto, InflowItem};
use odyssey_core::error::CoreError;
use odyssey_core::poc::PocStatus;
use odyssey_core::stage::{DecisionStatus, StageTarget};
use odyssey_core::types::{DbId, Timestamp};

/// A row from the `sub_events` table. JSONB payload columns deserialize
/// straight into the core domain types.
#[derive(Debug, Clone, FromRow)]
pub struct SubEvent {
    pub id: DbId,
    pub event_id: DbId,
    pub name: String,
    pub club_id: DbId,
    pub poc_id: DbId,
    pub poc_name: String,
    pub poc_phone: String,
    pub poc_status: String,
    pub sa_status: String,
    pub faculty_status: String,
    pub dean_status: String,
    pub budget_head: Decimal,
    pub budget_items: Json<Vec<BudgetItem>>,
    pub inflow_items: Json<Vec<InflowItem>>,
    pub budget_photos: Json<Vec<BudgetPhoto>>,
    pub after_event_items: Json<Vec<AfterEventItem>>,
    pub after_event_images: Json<Vec<AfterEventImage>>,
    pub after_event_budget_status: Option<String>,
    pub after_event_budget_delta: Option<Decimal>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl SubEvent {
    pub fn poc_status(&self) -> Result<PocStatus, CoreError> {
        self.poc_status.parse().map_err(|_| {
            CoreError::Internal(format!("Sub-event {} has invalid POC status", self.id))
        })
    }

    /// The stored review decision for one gate.
    pub fn decision(&self, target: StageTarget) -> Result<DecisionStatus, CoreError> {
        let raw = match target {
            StageTarget::Sa => &self.sa_status,
            StageTarget::Faculty => &self.faculty_status,
            StageTarget::Dean => &self.dean_status,
        };
        raw.parse().map_err(|_| {
            CoreError::Internal(format!("Sub-event {} has invalid {target} status", self.id))
        })
    }

    pub fn after_event_budget_status(
        &self,
    ) -> Result<Option<AfterEventBudgetStatus>, CoreError> {
        self.after_event_budget_status
            .as_deref()
            .map(str::parse)
            .transpose()
            .map_err(|_| {
                CoreError::Internal(format!(
                    "Sub-event {} has invalid after-event budget status",
                    self.id
                ))
            })
    }
}

/// DTO for inserting a new sub-event.
#[derive(Debug, Clone)]
pub struct CreateSubEvent {
    pub event_id: DbId,
    pub name: String,
    pub club_id: DbId,
    pub poc_id: DbId,
    pub poc_name: String,
    pub poc_phone: String,
    pub budget_head: Decimal,
    pub budget_items: Vec<BudgetItem>,
    pub inflow_items: Vec<InflowItem>,
    pub budget_photos: Vec<BudgetPhoto>,
}

/// After-event payload stored by [`crate::repositories::SubEventRepo::save_after_event`].
/// A full-document overwrite, never a merge.
#[derive(Debug, Clone)]
pub struct AfterEventRecord {
    pub items: Vec<AfterEventItem>,
    pub images: Vec<AfterEventImage>,
    pub budget_status: Option<AfterEventBudgetStatus>,
    pub budget_delta: Option<Decimal>,
}

/// A pending POC request row: the sub-event joined with its parent event's
/// title and requesting student, for the POC's inbox.
#[derive(Debug, Clone, FromRow)]
pub struct PendingPocRequest {
    pub id: DbId,
    pub event_id: DbId,
    pub name: String,
    pub club_id: DbId,
    pub budget_head: Decimal,
    pub budget_items: Json<Vec<BudgetItem>>,
    pub event_title: String,
    pub event_description: String,
    pub student_name: String,
    pub created_at: Timestamp,
}
