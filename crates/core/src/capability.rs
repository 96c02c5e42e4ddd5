//! Single capability-check point for every state-mutating operation.
//!
//! Handlers never branch on roles inline: they describe the attempted
//! operation as an [`Action`] and call [`authorize`]. Ownership constraints
//! (the owning student, the matching POC) are part of the action itself.

use crate::error::CoreError;
use crate::roles::Role;
use crate::stage::{DecisionStatus, EventStage, StageTarget};
use crate::types::DbId;

/// The authenticated caller.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub user_id: DbId,
    pub role: Role,
}

/// An operation a caller is attempting, with the ownership context needed to
/// decide it.
#[derive(Debug, Clone, Copy)]
pub enum Action {
    CreateEvent,
    /// Add or remove sub-events on an event owned by `owner_id`.
    ModifySubEvents { owner_id: DbId },
    /// Accept or decline the sub-event assigned to `poc_id`.
    PocDecision { poc_id: DbId },
    /// Decide at the given gate, for the event or one of its sub-events.
    ReviewDecision { target: StageTarget },
    ListReviewQueue,
    ListHistory,
    /// The admin dashboard view of every event regardless of stage.
    ListAllEvents,
    Override,
    /// Save after-event reconciliation on an event owned by `owner_id`.
    SaveAfterEvent { owner_id: DbId },
    SearchUsers,
    ManageUsers,
    ManageClubs,
}

/// Allow or deny `action` for `actor`. Returns `Forbidden` on deny.
pub fn authorize(actor: &Actor, action: &Action) -> Result<(), CoreError> {
    let allowed = match *action {
        Action::CreateEvent | Action::SearchUsers => actor.role == Role::Student,
        Action::ModifySubEvents { owner_id } | Action::SaveAfterEvent { owner_id } => {
            actor.role == Role::Student && actor.user_id == owner_id
        }
        Action::PocDecision { poc_id } => {
            actor.role == Role::Student && actor.user_id == poc_id
        }
        Action::ReviewDecision { target } => actor.role == target.owning_role(),
        Action::ListReviewQueue | Action::ListHistory => actor.role.review_target().is_some(),
        Action::ListAllEvents | Action::Override | Action::ManageUsers | Action::ManageClubs => {
            actor.role.is_admin()
        }
    };

    if allowed {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "Role {} may not perform this operation",
            actor.role
        )))
    }
}

/// Visibility rule for the event detail view.
///
/// The owner, any POC of the event, and admins always see it. A reviewer sees
/// it once their gate has been reached or they have already decided it.
pub fn can_view_event(
    actor: &Actor,
    owner_id: DbId,
    is_poc: bool,
    stage: EventStage,
    decision_for_role: Option<DecisionStatus>,
) -> bool {
    if actor.role.is_admin() {
        return true;
    }
    if actor.role == Role::Student {
        return actor.user_id == owner_id || is_poc;
    }

    let Some(target) = actor.role.review_target() else {
        return false;
    };
    if decision_for_role.is_some_and(DecisionStatus::is_decided) {
        return true;
    }
    stage_rank(stage) >= stage_rank(target.review_stage())
}

/// Ordinal position in the forward pipeline, used only for "has this stage
/// been reached" comparisons. Terminal stages rank past every gate.
fn stage_rank(stage: EventStage) -> u8 {
    match stage {
        EventStage::PendingPoc => 0,
        EventStage::SaReview => 1,
        EventStage::FacultyReview => 2,
        EventStage::DeanReview => 3,
        EventStage::Approved | EventStage::Rejected => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(user_id: DbId, role: Role) -> Actor {
        Actor { user_id, role }
    }

    #[test]
    fn only_students_create_events() {
        assert!(authorize(&actor(1, Role::Student), &Action::CreateEvent).is_ok());
        assert!(authorize(&actor(1, Role::Dean), &Action::CreateEvent).is_err());
        assert!(authorize(&actor(1, Role::Admin), &Action::CreateEvent).is_err());
    }

    #[test]
    fn ownership_is_enforced_for_student_operations() {
        let modify = Action::ModifySubEvents { owner_id: 7 };
        assert!(authorize(&actor(7, Role::Student), &modify).is_ok());
        assert!(authorize(&actor(8, Role::Student), &modify).is_err());

        let save = Action::SaveAfterEvent { owner_id: 7 };
        assert!(authorize(&actor(7, Role::Student), &save).is_ok());
        assert!(authorize(&actor(7, Role::Admin), &save).is_err());
    }

    #[test]
    fn only_the_assigned_poc_decides() {
        let action = Action::PocDecision { poc_id: 3 };
        assert!(authorize(&actor(3, Role::Student), &action).is_ok());
        assert!(authorize(&actor(4, Role::Student), &action).is_err());
    }

    #[test]
    fn review_decisions_match_the_gate_owner() {
        let sa = Action::ReviewDecision {
            target: StageTarget::Sa,
        };
        assert!(authorize(&actor(1, Role::SaOffice), &sa).is_ok());
        assert!(authorize(&actor(1, Role::Dean), &sa).is_err());
        assert!(authorize(&actor(1, Role::Admin), &sa).is_err());
    }

    #[test]
    fn override_is_admin_or_dev_only() {
        assert!(authorize(&actor(1, Role::Admin), &Action::Override).is_ok());
        assert!(authorize(&actor(1, Role::Dev), &Action::Override).is_ok());
        assert!(authorize(&actor(1, Role::Dean), &Action::Override).is_err());
        assert!(authorize(&actor(1, Role::Admin), &Action::ListAllEvents).is_ok());
        assert!(authorize(&actor(1, Role::Dean), &Action::ListAllEvents).is_err());
    }

    #[test]
    fn queues_are_for_reviewing_roles() {
        assert!(authorize(&actor(1, Role::FacultyCoordinator), &Action::ListReviewQueue).is_ok());
        assert!(authorize(&actor(1, Role::Student), &Action::ListReviewQueue).is_err());
        assert!(authorize(&actor(1, Role::Admin), &Action::ListHistory).is_err());
    }

    #[test]
    fn owner_poc_and_admin_always_view() {
        let owner = actor(5, Role::Student);
        assert!(can_view_event(&owner, 5, false, EventStage::PendingPoc, None));

        let poc = actor(6, Role::Student);
        assert!(can_view_event(&poc, 5, true, EventStage::PendingPoc, None));

        let stranger = actor(9, Role::Student);
        assert!(!can_view_event(&stranger, 5, false, EventStage::Approved, None));

        let dev = actor(1, Role::Dev);
        assert!(can_view_event(&dev, 5, false, EventStage::PendingPoc, None));
    }

    #[test]
    fn reviewers_see_events_from_their_gate_onward() {
        let sa = actor(2, Role::SaOffice);
        assert!(!can_view_event(
            &sa,
            5,
            false,
            EventStage::PendingPoc,
            Some(DecisionStatus::Pending)
        ));
        assert!(can_view_event(
            &sa,
            5,
            false,
            EventStage::SaReview,
            Some(DecisionStatus::Pending)
        ));
        // Later stages stay visible: the SA decision is history by then.
        assert!(can_view_event(
            &sa,
            5,
            false,
            EventStage::DeanReview,
            Some(DecisionStatus::Approved)
        ));

        let dean = actor(3, Role::Dean);
        assert!(!can_view_event(
            &dean,
            5,
            false,
            EventStage::SaReview,
            Some(DecisionStatus::Pending)
        ));
        // A rejected event is visible to a dean who already decided it.
        assert!(can_view_event(
            &dean,
            5,
            false,
            EventStage::Rejected,
            Some(DecisionStatus::Rejected)
        ));
    }
}
