//! The POC confirmation gate.
//!
//! Every sub-event names a point of contact who must accept it (attaching a
//! finalized budget) before the parent event can enter review. A declined
//! sub-event is terminal for the gate; the student recovers by removing it
//! and creating a replacement.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A point of contact's own confirmation state, distinct from the three
/// review-role decisions carried by the same sub-event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PocStatus {
    Pending,
    Accepted,
    Declined,
}

impl PocStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PocStatus::Pending => "PENDING",
            PocStatus::Accepted => "ACCEPTED",
            PocStatus::Declined => "DECLINED",
        }
    }
}

impl fmt::Display for PocStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PocStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(PocStatus::Pending),
            "ACCEPTED" => Ok(PocStatus::Accepted),
            "DECLINED" => Ok(PocStatus::Declined),
            other => Err(CoreError::Validation(format!(
                "Unknown POC status: {other}"
            ))),
        }
    }
}

/// The parent event may enter review only once every sub-event is ACCEPTED.
pub fn all_accepted(statuses: &[PocStatus]) -> bool {
    !statuses.is_empty() && statuses.iter().all(|s| *s == PocStatus::Accepted)
}

/// A POC may accept or decline exactly once, while PENDING.
pub fn ensure_pending(current: PocStatus) -> Result<(), CoreError> {
    match current {
        PocStatus::Pending => Ok(()),
        decided => Err(CoreError::InvalidState(format!(
            "This sub-event was already {decided} by its POC"
        ))),
    }
}
