//! Guards shared by the event- and sub-event-level review decisions.

use crate::error::CoreError;
use crate::stage::{DecisionStatus, EventStage, StageTarget};

/// Check that `stage` is exactly the stage owned by `target`.
///
/// Used both for the event-level decision (the reviewer must own the current
/// stage) and for sub-event decisions (the gate must be open). Overrides
/// bypass this check by design.
pub fn ensure_gate_open(target: StageTarget, stage: EventStage) -> Result<(), CoreError> {
    if stage == target.review_stage() {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "Event is at stage {stage}, not open for a {target} decision"
        )))
    }
}

/// Validate a single APPROVED/REJECTED decision against the field it targets.
///
/// The field may be set exactly once while PENDING; a rejection must carry a
/// non-blank remark. Returns the status to store.
pub fn validate_decision(
    current: DecisionStatus,
    approve: bool,
    remark: Option<&str>,
) -> Result<DecisionStatus, CoreError> {
    if current.is_decided() {
        return Err(CoreError::InvalidState(format!(
            "A decision was already recorded ({current})"
        )));
    }
    if approve {
        return Ok(DecisionStatus::Approved);
    }
    match remark {
        Some(r) if !r.trim().is_empty() => Ok(DecisionStatus::Rejected),
        _ => Err(CoreError::Validation("Rejections require a remark".into())),
    }
}

/// The event-level decision is accepted only once the reviewer has resolved
/// every sub-event's status for their gate.
pub fn ensure_all_sub_events_decided(
    target: StageTarget,
    statuses: &[DecisionStatus],
) -> Result<(), CoreError> {
    let pending = statuses.iter().filter(|s| !s.is_decided()).count();
    if pending > 0 {
        return Err(CoreError::PreconditionFailed(format!(
            "{pending} sub-event(s) still awaiting a {target} decision"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::DecisionStatus::{Approved, Pending, Rejected};
    use super::*;

    #[test]
    fn gate_must_match_current_stage() {
        assert!(ensure_gate_open(StageTarget::Sa, EventStage::SaReview).is_ok());
        assert!(matches!(
            ensure_gate_open(StageTarget::Sa, EventStage::FacultyReview),
            Err(CoreError::Forbidden(_))
        ));
        assert!(matches!(
            ensure_gate_open(StageTarget::Dean, EventStage::PendingPoc),
            Err(CoreError::Forbidden(_))
        ));
    }

    #[test]
    fn approval_never_requires_a_remark() {
        assert_eq!(validate_decision(Pending, true, None).unwrap(), Approved);
    }

    #[test]
    fn rejection_requires_a_non_blank_remark() {
        assert_eq!(
            validate_decision(Pending, false, Some("Budget excessive")).unwrap(),
            Rejected
        );
        assert!(matches!(
            validate_decision(Pending, false, None),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            validate_decision(Pending, false, Some("   ")),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn already_decided_field_cannot_be_redecided() {
        assert!(matches!(
            validate_decision(Approved, true, None),
            Err(CoreError::InvalidState(_))
        ));
        assert!(matches!(
            validate_decision(Rejected, false, Some("again")),
            Err(CoreError::InvalidState(_))
        ));
    }

    #[test]
    fn event_decision_waits_for_every_sub_event() {
        assert!(ensure_all_sub_events_decided(StageTarget::Sa, &[Approved, Rejected]).is_ok());
        assert!(matches!(
            ensure_all_sub_events_decided(StageTarget::Sa, &[Approved, Pending]),
            Err(CoreError::PreconditionFailed(_))
        ));
    }

    #[test]
    fn event_with_no_sub_events_has_nothing_pending() {
        // Creation enforces at least one sub-event; an empty list here means
        // every sub-event is resolved.
        assert!(ensure_all_sub_events_decided(StageTarget::Dean, &[]).is_ok());
    }
}
