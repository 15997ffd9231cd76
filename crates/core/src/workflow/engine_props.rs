//! Property-based tests for the approval engine.
//!
//! These validate the workflow's correctness properties (sequential
//! enforcement, monotonic progression, early termination, terminal
//! behavior) using proptest for randomized input generation.

use proptest::prelude::*;

use crate::workflow::engine::ApprovalEngine;
use crate::workflow::error::WorkflowError;
use crate::workflow::types::{ApplicationStatus, ApprovalStage, Decision, FinalResult};

/// Strategy for generating random ApplicationStatus values.
fn arb_status() -> impl Strategy<Value = ApplicationStatus> {
    prop_oneof![
        Just(ApplicationStatus::Submitted),
        Just(ApplicationStatus::PendingManager),
        Just(ApplicationStatus::PendingDirector),
        Just(ApplicationStatus::PendingChairperson),
        Just(ApplicationStatus::PendingCeo),
        Just(ApplicationStatus::Approved),
        Just(ApplicationStatus::Rejected),
    ]
}

/// Strategy for generating non-terminal (pending) statuses.
fn arb_pending_status() -> impl Strategy<Value = ApplicationStatus> {
    prop_oneof![
        Just(ApplicationStatus::Submitted),
        Just(ApplicationStatus::PendingManager),
        Just(ApplicationStatus::PendingDirector),
        Just(ApplicationStatus::PendingChairperson),
        Just(ApplicationStatus::PendingCeo),
    ]
}

/// Strategy for generating random role strings, valid and not.
fn arb_role() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("field_officer".to_string()),
        Just("manager".to_string()),
        Just("director".to_string()),
        Just("chairperson".to_string()),
        Just("ceo".to_string()),
        "[a-z_]{1,20}",
    ]
}

/// Strategy for generating decisions.
fn arb_decision() -> impl Strategy<Value = Decision> {
    prop_oneof![Just(Decision::Approve), Just(Decision::Reject)]
}

/// Position of a stage in the fixed order.
fn stage_index(stage: ApprovalStage) -> usize {
    ApprovalStage::ORDER
        .iter()
        .position(|s| *s == stage)
        .expect("stage is in ORDER")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // =========================================================================
    // Property: Sequential enforcement
    // A decision by a role other than the stage awaiting action always
    // fails with UnauthorizedStage.
    // =========================================================================
    #[test]
    fn prop_wrong_role_never_acts(
        status in arb_pending_status(),
        role in arb_role(),
        decision in arb_decision(),
    ) {
        let expected = ApprovalEngine::expected_stage(status).unwrap();
        prop_assume!(role != expected.as_str());

        let result = ApprovalEngine::decide(status, &role, decision);
        let is_unauthorized = matches!(result, Err(WorkflowError::UnauthorizedStage { .. }));
        prop_assert!(is_unauthorized);
    }

    // =========================================================================
    // Property: Monotonic progression
    // An approve from any pending status moves to the immediately next
    // stage (or terminal approved), never backward or skipping.
    // =========================================================================
    #[test]
    fn prop_approve_moves_exactly_one_stage_forward(status in arb_pending_status()) {
        let stage = ApprovalEngine::expected_stage(status).unwrap();
        let outcome = ApprovalEngine::decide(status, stage.as_str(), Decision::Approve).unwrap();

        match outcome.next_stage {
            Some(next) => {
                prop_assert_eq!(stage_index(next), stage_index(stage) + 1);
                prop_assert_eq!(outcome.new_status, next.pending_status());
                prop_assert!(!outcome.is_final_decision);
            }
            None => {
                prop_assert_eq!(stage, ApprovalStage::Ceo);
                prop_assert_eq!(outcome.new_status, ApplicationStatus::Approved);
                prop_assert!(outcome.is_final_decision);
                prop_assert_eq!(outcome.final_result, Some(FinalResult::Successful));
            }
        }
    }

    // =========================================================================
    // Property: Early termination on reject
    // Rejecting at any stage is immediately terminal with FAILED.
    // =========================================================================
    #[test]
    fn prop_reject_terminates_immediately(status in arb_pending_status()) {
        let stage = ApprovalEngine::expected_stage(status).unwrap();
        let outcome = ApprovalEngine::decide(status, stage.as_str(), Decision::Reject).unwrap();

        prop_assert_eq!(outcome.new_status, ApplicationStatus::Rejected);
        prop_assert_eq!(outcome.next_stage, None);
        prop_assert!(outcome.is_final_decision);
        prop_assert_eq!(outcome.final_result, Some(FinalResult::Failed));
    }

    // =========================================================================
    // Property: Terminal states accept nothing
    // =========================================================================
    #[test]
    fn prop_terminal_status_accepts_no_decision(
        role in arb_role(),
        decision in arb_decision(),
    ) {
        for status in [ApplicationStatus::Approved, ApplicationStatus::Rejected] {
            let result = ApprovalEngine::decide(status, &role, decision);
            let is_invalid_transition = matches!(result, Err(WorkflowError::InvalidTransition { .. }));
            prop_assert!(is_invalid_transition);
        }
    }

    // =========================================================================
    // Property: finality marker is consistent
    // is_final_decision is true iff final_result is set iff the new
    // status is terminal.
    // =========================================================================
    #[test]
    fn prop_finality_marker_consistent(
        status in arb_status(),
        role in arb_role(),
        decision in arb_decision(),
    ) {
        if let Ok(outcome) = ApprovalEngine::decide(status, &role, decision) {
            prop_assert_eq!(outcome.is_final_decision, outcome.final_result.is_some());
            prop_assert_eq!(outcome.is_final_decision, outcome.new_status.is_terminal());
            prop_assert_eq!(outcome.is_final_decision, outcome.next_stage.is_none());
        }
    }

    // =========================================================================
    // Property: errors never invent stages
    // UnauthorizedStage always names the stage the status maps to.
    // =========================================================================
    #[test]
    fn prop_unauthorized_names_expected_stage(
        status in arb_pending_status(),
        role in arb_role(),
        decision in arb_decision(),
    ) {
        let expected = ApprovalEngine::expected_stage(status).unwrap();
        prop_assume!(role != expected.as_str());

        match ApprovalEngine::decide(status, &role, decision) {
            Err(WorkflowError::UnauthorizedStage { acting_role, expected_stage }) => {
                prop_assert_eq!(acting_role, role);
                prop_assert_eq!(expected_stage, expected);
            }
            other => prop_assert!(false, "expected UnauthorizedStage, got {other:?}"),
        }
    }
}
