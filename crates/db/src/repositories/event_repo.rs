//! Repository for the `events` table.

use sqlx::PgExecutor;

use odyssey_core::stage::{DecisionStatus, EventStage, StageTarget};
use odyssey_core::types::DbId;

use crate::models::event::{CreateEvent, Event};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, student_id, title, description, stage, \
    sa_status, sa_remark, faculty_status, faculty_remark, dean_status, dean_remark, \
    created_at, updated_at";

/// The status/remark column pair owned by a review gate.
fn decision_columns(target: StageTarget) -> (&'static str, &'static str) {
    match target {
        StageTarget::Sa => ("sa_status", "sa_remark"),
        StageTarget::Faculty => ("faculty_status", "faculty_remark"),
        StageTarget::Dean => ("dean_status", "dean_remark"),
    }
}

/// Provides CRUD and state-transition queries for events.
pub struct EventRepo;

impl EventRepo {
    /// Insert a new event in PENDING_POC, returning the created row.
    pub async fn create(
        exec: impl PgExecutor<'_>,
        input: &CreateEvent,
    ) -> Result<Event, sqlx::Error> {
        let query = format!(
            "INSERT INTO events (student_id, title, description)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(input.student_id)
            .bind(&input.title)
            .bind(&input.description)
            .fetch_one(exec)
            .await
    }

    pub async fn find_by_id(
        exec: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE id = $1");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(exec)
            .await
    }

    /// Fetch an event under a row lock. Every state transition starts here so
    /// concurrent decisions on the same event serialize instead of racing.
    /// Must be called inside a transaction.
    pub async fn lock_by_id(
        exec: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(exec)
            .await
    }

    /// List a student's own events, newest first.
    pub async fn list_for_student(
        exec: impl PgExecutor<'_>,
        student_id: DbId,
    ) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM events WHERE student_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(student_id)
            .fetch_all(exec)
            .await
    }

    /// A reviewer's pending queue: every event currently at the given stage.
    pub async fn list_by_stage(
        exec: impl PgExecutor<'_>,
        stage: EventStage,
    ) -> Result<Vec<Event>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM events WHERE stage = $1 ORDER BY created_at DESC");
        sqlx::query_as::<_, Event>(&query)
            .bind(stage.as_str())
            .fetch_all(exec)
            .await
    }

    /// List all events, newest first. Admin dashboards only.
    pub async fn list_all(exec: impl PgExecutor<'_>) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events ORDER BY created_at DESC");
        sqlx::query_as::<_, Event>(&query).fetch_all(exec).await
    }

    /// A reviewer's history: events they have already decided, ordered by
    /// last update, optionally restricted to events touching one club.
    pub async fn list_history(
        exec: impl PgExecutor<'_>,
        target: StageTarget,
        descending: bool,
        club_id: Option<DbId>,
    ) -> Result<Vec<Event>, sqlx::Error> {
        let (status_col, _) = decision_columns(target);
        let order = if descending { "DESC" } else { "ASC" };
        let club_filter = if club_id.is_some() {
            "AND EXISTS (SELECT 1 FROM sub_events se
                         WHERE se.event_id = events.id AND se.club_id = $1)"
        } else {
            ""
        };
        let query = format!(
            "SELECT {COLUMNS} FROM events
             WHERE {status_col} <> 'PENDING' {club_filter}
             ORDER BY updated_at {order}"
        );
        let mut q = sqlx::query_as::<_, Event>(&query);
        if let Some(club_id) = club_id {
            q = q.bind(club_id);
        }
        q.fetch_all(exec).await
    }

    /// Record one gate's decision and the freshly derived stage in a single
    /// atomic update.
    pub async fn update_decision(
        exec: impl PgExecutor<'_>,
        id: DbId,
        target: StageTarget,
        status: DecisionStatus,
        remark: Option<&str>,
        stage: EventStage,
    ) -> Result<Event, sqlx::Error> {
        let (status_col, remark_col) = decision_columns(target);
        let query = format!(
            "UPDATE events
             SET {status_col} = $2, {remark_col} = $3, stage = $4, updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(status.as_str())
            .bind(remark)
            .bind(stage.as_str())
            .fetch_one(exec)
            .await
    }

    /// Persist a newly derived stage (POC gate transitions, sub-event edits).
    pub async fn update_stage(
        exec: impl PgExecutor<'_>,
        id: DbId,
        stage: EventStage,
    ) -> Result<Event, sqlx::Error> {
        let query = format!(
            "UPDATE events SET stage = $2, updated_at = now() WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(stage.as_str())
            .fetch_one(exec)
            .await
    }
}
