//! The event-level review state machine.
//!
//! An event moves strictly forward through
//! `PENDING_POC -> SA_REVIEW -> FACULTY_REVIEW -> DEAN_REVIEW -> APPROVED`,
//! or to `REJECTED` from any review stage. The stage is never stored
//! independently of the per-stage decisions: [`compute_stage`] derives it
//! after every mutation, so stage and decision fields cannot drift apart.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::roles::Role;

/// Maximum number of sub-events a single event may carry.
pub const MAX_SUB_EVENTS: usize = 15;

/// Position of an event in the review pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStage {
    PendingPoc,
    SaReview,
    FacultyReview,
    DeanReview,
    Approved,
    Rejected,
}

impl EventStage {
    pub fn as_str(self) -> &'static str {
        match self {
            EventStage::PendingPoc => "PENDING_POC",
            EventStage::SaReview => "SA_REVIEW",
            EventStage::FacultyReview => "FACULTY_REVIEW",
            EventStage::DeanReview => "DEAN_REVIEW",
            EventStage::Approved => "APPROVED",
            EventStage::Rejected => "REJECTED",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, EventStage::Approved | EventStage::Rejected)
    }

    /// The review gate currently open at this stage, if any.
    pub fn review_target(self) -> Option<StageTarget> {
        match self {
            EventStage::SaReview => Some(StageTarget::Sa),
            EventStage::FacultyReview => Some(StageTarget::Faculty),
            EventStage::DeanReview => Some(StageTarget::Dean),
            _ => None,
        }
    }
}

impl fmt::Display for EventStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStage {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING_POC" => Ok(EventStage::PendingPoc),
            "SA_REVIEW" => Ok(EventStage::SaReview),
            "FACULTY_REVIEW" => Ok(EventStage::FacultyReview),
            "DEAN_REVIEW" => Ok(EventStage::DeanReview),
            "APPROVED" => Ok(EventStage::Approved),
            "REJECTED" => Ok(EventStage::Rejected),
            other => Err(CoreError::Validation(format!("Unknown stage: {other}"))),
        }
    }
}

/// Outcome of a single reviewing role's decision, at event or sub-event level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionStatus {
    Pending,
    Approved,
    Rejected,
}

impl DecisionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DecisionStatus::Pending => "PENDING",
            DecisionStatus::Approved => "APPROVED",
            DecisionStatus::Rejected => "REJECTED",
        }
    }

    pub fn is_decided(self) -> bool {
        self != DecisionStatus::Pending
    }
}

impl fmt::Display for DecisionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DecisionStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(DecisionStatus::Pending),
            "APPROVED" => Ok(DecisionStatus::Approved),
            "REJECTED" => Ok(DecisionStatus::Rejected),
            other => Err(CoreError::Validation(format!(
                "Unknown decision status: {other}"
            ))),
        }
    }
}

/// One of the three review gates. Each gate is owned by exactly one role and
/// corresponds to one review stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StageTarget {
    Sa,
    Faculty,
    Dean,
}

impl StageTarget {
    pub fn as_str(self) -> &'static str {
        match self {
            StageTarget::Sa => "SA",
            StageTarget::Faculty => "FACULTY",
            StageTarget::Dean => "DEAN",
        }
    }

    /// The stage during which this gate is open.
    pub fn review_stage(self) -> EventStage {
        match self {
            StageTarget::Sa => EventStage::SaReview,
            StageTarget::Faculty => EventStage::FacultyReview,
            StageTarget::Dean => EventStage::DeanReview,
        }
    }

    /// The reviewing role that owns this gate.
    pub fn owning_role(self) -> Role {
        match self {
            StageTarget::Sa => Role::SaOffice,
            StageTarget::Faculty => Role::FacultyCoordinator,
            StageTarget::Dean => Role::Dean,
        }
    }
}

impl fmt::Display for StageTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StageTarget {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SA" => Ok(StageTarget::Sa),
            "FACULTY" => Ok(StageTarget::Faculty),
            "DEAN" => Ok(StageTarget::Dean),
            other => Err(CoreError::Validation(format!(
                "Unknown stage target: {other}"
            ))),
        }
    }
}

/// Derive the stage from the POC gate and the three per-stage decisions.
///
/// Walks the pipeline front to back: the first gate that is not APPROVED
/// determines the stage (its review stage while PENDING, `Rejected` once
/// REJECTED). The POC gate is only consulted while the SA decision is still
/// pending; an override that approves a later gate therefore advances the
/// event even if a sub-event never finished POC confirmation.
pub fn compute_stage(
    poc_complete: bool,
    sa: DecisionStatus,
    faculty: DecisionStatus,
    dean: DecisionStatus,
) -> EventStage {
    match sa {
        DecisionStatus::Rejected => return EventStage::Rejected,
        DecisionStatus::Pending => {
            return if poc_complete {
                EventStage::SaReview
            } else {
                EventStage::PendingPoc
            };
        }
        DecisionStatus::Approved => {}
    }

    match faculty {
        DecisionStatus::Rejected => return EventStage::Rejected,
        DecisionStatus::Pending => return EventStage::FacultyReview,
        DecisionStatus::Approved => {}
    }

    match dean {
        DecisionStatus::Rejected => EventStage::Rejected,
        DecisionStatus::Pending => EventStage::DeanReview,
        DecisionStatus::Approved => EventStage::Approved,
    }
}
