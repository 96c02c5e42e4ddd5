//! Repository for the `sub_events` table.

use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::PgExecutor;

use odyssey_core::budget::BudgetItem;
use odyssey_core::poc::PocStatus;
use odyssey_core::stage::{DecisionStatus, StageTarget};
use odyssey_core::types::DbId;

use crate::models::sub_event::{AfterEventRecord, CreateSubEvent, PendingPocRequest, SubEvent};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, event_id, name, club_id, poc_id, poc_name, poc_phone, \
    poc_status, sa_status, faculty_status, dean_status, \
    budget_head, budget_items, inflow_items, budget_photos, \
    after_event_items, after_event_images, after_event_budget_status, after_event_budget_delta, \
    created_at, updated_at";

/// The sub-event status column owned by a review gate.
fn decision_column(target: StageTarget) -> &'static str {
    match target {
        StageTarget::Sa => "sa_status",
        StageTarget::Faculty => "faculty_status",
        StageTarget::Dean => "dean_status",
    }
}

/// Provides CRUD and state-transition queries for sub-events.
pub struct SubEventRepo;

impl SubEventRepo {
    /// Insert a new sub-event, returning the created row.
    pub async fn create(
        exec: impl PgExecutor<'_>,
        input: &CreateSubEvent,
    ) -> Result<SubEvent, sqlx::Error> {
        let query = format!(
            "INSERT INTO sub_events
                (event_id, name, club_id, poc_id, poc_name, poc_phone,
                 budget_head, budget_items, inflow_items, budget_photos)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SubEvent>(&query)
            .bind(input.event_id)
            .bind(&input.name)
            .bind(input.club_id)
            .bind(input.poc_id)
            .bind(&input.poc_name)
            .bind(&input.poc_phone)
            .bind(input.budget_head)
            .bind(Json(&input.budget_items))
            .bind(Json(&input.inflow_items))
            .bind(Json(&input.budget_photos))
            .fetch_one(exec)
            .await
    }

    pub async fn find_by_id(
        exec: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<SubEvent>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sub_events WHERE id = $1");
        sqlx::query_as::<_, SubEvent>(&query)
            .bind(id)
            .fetch_optional(exec)
            .await
    }

    /// All sub-events of one event, in creation order.
    pub async fn list_for_event(
        exec: impl PgExecutor<'_>,
        event_id: DbId,
    ) -> Result<Vec<SubEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sub_events WHERE event_id = $1 ORDER BY id ASC"
        );
        sqlx::query_as::<_, SubEvent>(&query)
            .bind(event_id)
            .fetch_all(exec)
            .await
    }

    /// A POC's inbox: sub-events assigned to them and still awaiting their
    /// confirmation, joined with the parent event for context.
    pub async fn list_pending_for_poc(
        exec: impl PgExecutor<'_>,
        poc_id: DbId,
    ) -> Result<Vec<PendingPocRequest>, sqlx::Error> {
        sqlx::query_as::<_, PendingPocRequest>(
            "SELECT
                se.id, se.event_id, se.name, se.club_id, se.budget_head, se.budget_items,
                e.title AS event_title,
                e.description AS event_description,
                u.display_name AS student_name,
                se.created_at
             FROM sub_events se
             JOIN events e ON e.id = se.event_id
             JOIN users u ON u.id = e.student_id
             WHERE se.poc_id = $1 AND se.poc_status = 'PENDING'
             ORDER BY se.created_at ASC",
        )
        .bind(poc_id)
        .fetch_all(exec)
        .await
    }

    /// Record a POC acceptance together with the finalized budget.
    pub async fn accept(
        exec: impl PgExecutor<'_>,
        id: DbId,
        budget_head: Decimal,
        budget_items: &[BudgetItem],
    ) -> Result<SubEvent, sqlx::Error> {
        let query = format!(
            "UPDATE sub_events
             SET poc_status = $2, budget_head = $3, budget_items = $4, updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SubEvent>(&query)
            .bind(id)
            .bind(PocStatus::Accepted.as_str())
            .bind(budget_head)
            .bind(Json(budget_items))
            .fetch_one(exec)
            .await
    }

    /// Record a POC decline. Terminal for the confirmation gate.
    pub async fn decline(exec: impl PgExecutor<'_>, id: DbId) -> Result<SubEvent, sqlx::Error> {
        let query = format!(
            "UPDATE sub_events SET poc_status = $2, updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SubEvent>(&query)
            .bind(id)
            .bind(PocStatus::Declined.as_str())
            .fetch_one(exec)
            .await
    }

    /// Record one gate's decision on a single sub-event.
    pub async fn update_review_status(
        exec: impl PgExecutor<'_>,
        id: DbId,
        target: StageTarget,
        status: DecisionStatus,
    ) -> Result<SubEvent, sqlx::Error> {
        let status_col = decision_column(target);
        let query = format!(
            "UPDATE sub_events SET {status_col} = $2, updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SubEvent>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_one(exec)
            .await
    }

    /// Overwrite the after-event reconciliation wholesale.
    pub async fn save_after_event(
        exec: impl PgExecutor<'_>,
        id: DbId,
        record: &AfterEventRecord,
    ) -> Result<SubEvent, sqlx::Error> {
        let query = format!(
            "UPDATE sub_events
             SET after_event_items = $2,
                 after_event_images = $3,
                 after_event_budget_status = $4,
                 after_event_budget_delta = $5,
                 updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SubEvent>(&query)
            .bind(id)
            .bind(Json(&record.items))
            .bind(Json(&record.images))
            .bind(record.budget_status.map(|s| s.as_str()))
            .bind(record.budget_delta)
            .fetch_one(exec)
            .await
    }

    /// Remove a sub-event. Returns the number of rows removed.
    pub async fn delete(exec: impl PgExecutor<'_>, id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sub_events WHERE id = $1")
            .bind(id)
            .execute(exec)
            .await?;
        Ok(result.rows_affected())
    }

    /// Whether any sub-event still references the given club. Guards club
    /// deletion.
    pub async fn club_in_use(
        exec: impl PgExecutor<'_>,
        club_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM sub_events WHERE club_id = $1)")
            .bind(club_id)
            .fetch_one(exec)
            .await
    }
}
