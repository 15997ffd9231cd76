//! Approval engine for loan application state transitions.
//!
//! This module implements the core state machine logic: which stage
//! is awaiting action for a given status, whether the acting user may
//! act there, and what a decision does to the application.

use crate::workflow::error::WorkflowError;
use crate::workflow::types::{ApplicationStatus, ApprovalStage, Decision, FinalResult};

/// Outcome of a validated decision.
///
/// Captures the resulting status, the stage awaiting action next (if
/// any), and the terminal marker the presentation layer uses to drive
/// its outcome display. The engine has no further obligation once
/// this is returned; notifications and animations belong to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionOutcome {
    /// The stage the decision was applied at.
    pub stage: ApprovalStage,
    /// The decision that was applied.
    pub decision: Decision,
    /// The application's new status.
    pub new_status: ApplicationStatus,
    /// The next stage awaiting action, `None` when terminal.
    pub next_stage: Option<ApprovalStage>,
    /// Whether this decision ended the workflow.
    pub is_final_decision: bool,
    /// Terminal result, set iff `is_final_decision`.
    pub final_result: Option<FinalResult>,
}

/// Stateless engine for evaluating approval decisions.
///
/// All methods are associated functions; the engine holds no state
/// between invocations. Persistence and locking are the repository
/// layer's concern.
pub struct ApprovalEngine;

impl ApprovalEngine {
    /// Returns the stage awaiting action for a status.
    ///
    /// Total over non-terminal statuses; `submitted` rows await the
    /// manager like `pending_manager` rows do (the field officer's
    /// stage is implicitly approved at submission). Terminal statuses
    /// have no expected stage.
    #[must_use]
    pub const fn expected_stage(status: ApplicationStatus) -> Option<ApprovalStage> {
        match status {
            ApplicationStatus::Submitted | ApplicationStatus::PendingManager => {
                Some(ApprovalStage::Manager)
            }
            ApplicationStatus::PendingDirector => Some(ApprovalStage::Director),
            ApplicationStatus::PendingChairperson => Some(ApprovalStage::Chairperson),
            ApplicationStatus::PendingCeo => Some(ApprovalStage::Ceo),
            ApplicationStatus::Approved | ApplicationStatus::Rejected => None,
        }
    }

    /// Validates and evaluates a decision against the current status.
    ///
    /// The role check is a flat string match: `acting_role` must equal
    /// the expected stage's name exactly. There is no role hierarchy;
    /// a director cannot act at the manager stage.
    ///
    /// # Errors
    ///
    /// * `WorkflowError::InvalidTransition` if the status is terminal
    /// * `WorkflowError::UnauthorizedStage` if `acting_role` does not
    ///   match the stage awaiting action
    pub fn decide(
        current_status: ApplicationStatus,
        acting_role: &str,
        decision: Decision,
    ) -> Result<DecisionOutcome, WorkflowError> {
        let Some(stage) = Self::expected_stage(current_status) else {
            return Err(WorkflowError::InvalidTransition {
                status: current_status,
            });
        };

        if acting_role != stage.as_str() {
            return Err(WorkflowError::UnauthorizedStage {
                acting_role: acting_role.to_string(),
                expected_stage: stage,
            });
        }

        let outcome = match (decision, stage.next()) {
            // Reject terminates immediately, regardless of stage.
            (Decision::Reject, _) => DecisionOutcome {
                stage,
                decision,
                new_status: ApplicationStatus::Rejected,
                next_stage: None,
                is_final_decision: true,
                final_result: Some(FinalResult::Failed),
            },
            // Approve at the CEO stage is the terminal approval.
            (Decision::Approve, None) => DecisionOutcome {
                stage,
                decision,
                new_status: ApplicationStatus::Approved,
                next_stage: None,
                is_final_decision: true,
                final_result: Some(FinalResult::Successful),
            },
            // Approve elsewhere advances to the next stage.
            (Decision::Approve, Some(next)) => DecisionOutcome {
                stage,
                decision,
                new_status: next.pending_status(),
                next_stage: Some(next),
                is_final_decision: false,
                final_result: None,
            },
        };

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ApplicationStatus::Submitted, Some(ApprovalStage::Manager))]
    #[case(ApplicationStatus::PendingManager, Some(ApprovalStage::Manager))]
    #[case(ApplicationStatus::PendingDirector, Some(ApprovalStage::Director))]
    #[case(ApplicationStatus::PendingChairperson, Some(ApprovalStage::Chairperson))]
    #[case(ApplicationStatus::PendingCeo, Some(ApprovalStage::Ceo))]
    #[case(ApplicationStatus::Approved, None)]
    #[case(ApplicationStatus::Rejected, None)]
    fn test_expected_stage_mapping(
        #[case] status: ApplicationStatus,
        #[case] expected: Option<ApprovalStage>,
    ) {
        assert_eq!(ApprovalEngine::expected_stage(status), expected);
    }

    #[test]
    fn test_manager_approve_advances_to_director() {
        let outcome = ApprovalEngine::decide(
            ApplicationStatus::PendingManager,
            "manager",
            Decision::Approve,
        )
        .unwrap();

        assert_eq!(outcome.new_status, ApplicationStatus::PendingDirector);
        assert_eq!(outcome.next_stage, Some(ApprovalStage::Director));
        assert!(!outcome.is_final_decision);
        assert_eq!(outcome.final_result, None);
    }

    #[test]
    fn test_submitted_status_awaits_manager() {
        let outcome =
            ApprovalEngine::decide(ApplicationStatus::Submitted, "manager", Decision::Approve)
                .unwrap();
        assert_eq!(outcome.new_status, ApplicationStatus::PendingDirector);
    }

    #[test]
    fn test_ceo_approve_is_terminal_success() {
        let outcome =
            ApprovalEngine::decide(ApplicationStatus::PendingCeo, "ceo", Decision::Approve)
                .unwrap();

        assert_eq!(outcome.new_status, ApplicationStatus::Approved);
        assert_eq!(outcome.next_stage, None);
        assert!(outcome.is_final_decision);
        assert_eq!(outcome.final_result, Some(FinalResult::Successful));
    }

    #[test]
    fn test_reject_is_terminal_at_any_stage() {
        for (status, role) in [
            (ApplicationStatus::PendingManager, "manager"),
            (ApplicationStatus::PendingDirector, "director"),
            (ApplicationStatus::PendingChairperson, "chairperson"),
            (ApplicationStatus::PendingCeo, "ceo"),
        ] {
            let outcome = ApprovalEngine::decide(status, role, Decision::Reject).unwrap();
            assert_eq!(outcome.new_status, ApplicationStatus::Rejected);
            assert_eq!(outcome.next_stage, None);
            assert!(outcome.is_final_decision);
            assert_eq!(outcome.final_result, Some(FinalResult::Failed));
        }
    }

    #[test]
    fn test_wrong_role_is_unauthorized() {
        let result = ApprovalEngine::decide(
            ApplicationStatus::PendingManager,
            "director",
            Decision::Approve,
        );

        assert!(matches!(
            result,
            Err(WorkflowError::UnauthorizedStage {
                expected_stage: ApprovalStage::Manager,
                ..
            })
        ));
    }

    #[test]
    fn test_role_match_is_exact_not_hierarchical() {
        // A CEO outranks a manager organizationally, but the check is flat.
        let result =
            ApprovalEngine::decide(ApplicationStatus::PendingManager, "ceo", Decision::Approve);
        assert!(matches!(
            result,
            Err(WorkflowError::UnauthorizedStage { .. })
        ));
    }

    #[test]
    fn test_unknown_role_is_unauthorized() {
        let result = ApprovalEngine::decide(
            ApplicationStatus::PendingDirector,
            "loans_clerk",
            Decision::Approve,
        );
        assert!(matches!(
            result,
            Err(WorkflowError::UnauthorizedStage { .. })
        ));
    }

    #[test]
    fn test_terminal_status_rejects_decisions() {
        for status in [ApplicationStatus::Approved, ApplicationStatus::Rejected] {
            for decision in [Decision::Approve, Decision::Reject] {
                let result = ApprovalEngine::decide(status, "ceo", decision);
                assert!(matches!(
                    result,
                    Err(WorkflowError::InvalidTransition { .. })
                ));
            }
        }
    }

    #[test]
    fn test_full_approval_chain() {
        let mut status = ApplicationStatus::PendingManager;
        for role in ["manager", "director", "chairperson"] {
            let outcome = ApprovalEngine::decide(status, role, Decision::Approve).unwrap();
            assert!(!outcome.is_final_decision);
            status = outcome.new_status;
        }

        let last = ApprovalEngine::decide(status, "ceo", Decision::Approve).unwrap();
        assert_eq!(last.new_status, ApplicationStatus::Approved);
        assert_eq!(last.final_result, Some(FinalResult::Successful));
    }
}
