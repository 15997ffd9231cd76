//! Workflow domain types for loan application lifecycle management.
//!
//! This module defines the core types used for tracking a loan
//! application through the five-stage approval chain.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Loan application status in the approval workflow.
///
/// Applications progress through the pending states in stage order
/// and end in one of the two terminal states:
/// - `pending_manager` → `pending_director` → `pending_chairperson` → `pending_ceo` → `approved`
/// - any pending state → `rejected` (a rejection at any stage is terminal)
///
/// `submitted` is an alias for "awaiting manager" kept for rows
/// written by older intake clients; new rows use `pending_manager`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    /// Application has been submitted and awaits the manager (legacy alias).
    Submitted,
    /// Awaiting the manager's decision.
    PendingManager,
    /// Awaiting the director's decision.
    PendingDirector,
    /// Awaiting the chairperson's decision.
    PendingChairperson,
    /// Awaiting the CEO's decision.
    PendingCeo,
    /// Approved by the CEO (terminal).
    Approved,
    /// Rejected at some stage (terminal).
    Rejected,
}

impl ApplicationStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::PendingManager => "pending_manager",
            Self::PendingDirector => "pending_director",
            Self::PendingChairperson => "pending_chairperson",
            Self::PendingCeo => "pending_ceo",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "submitted" => Some(Self::Submitted),
            "pending_manager" => Some(Self::PendingManager),
            "pending_director" => Some(Self::PendingDirector),
            "pending_chairperson" => Some(Self::PendingChairperson),
            "pending_ceo" => Some(Self::PendingCeo),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Returns true if the application accepts no further decisions.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One named step in the fixed approval order.
///
/// Stages are acted upon strictly in the order of [`ApprovalStage::ORDER`].
/// Stage names double as staff role names: authorization is a flat
/// string match between the acting user's role and the current stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStage {
    /// The field officer who submitted the application.
    FieldOfficer = 0,
    /// Branch manager, first human reviewer.
    Manager = 1,
    /// Director sign-off.
    Director = 2,
    /// Chairperson sign-off.
    Chairperson = 3,
    /// CEO, final sign-off.
    Ceo = 4,
}

impl ApprovalStage {
    /// The fixed approval order.
    pub const ORDER: [Self; 5] = [
        Self::FieldOfficer,
        Self::Manager,
        Self::Director,
        Self::Chairperson,
        Self::Ceo,
    ];

    /// Returns the stage after this one, or `None` for the CEO.
    #[must_use]
    pub const fn next(&self) -> Option<Self> {
        match self {
            Self::FieldOfficer => Some(Self::Manager),
            Self::Manager => Some(Self::Director),
            Self::Director => Some(Self::Chairperson),
            Self::Chairperson => Some(Self::Ceo),
            Self::Ceo => None,
        }
    }

    /// Returns the pending status awaiting this stage's decision.
    #[must_use]
    pub const fn pending_status(&self) -> ApplicationStatus {
        match self {
            Self::FieldOfficer => ApplicationStatus::Submitted,
            Self::Manager => ApplicationStatus::PendingManager,
            Self::Director => ApplicationStatus::PendingDirector,
            Self::Chairperson => ApplicationStatus::PendingChairperson,
            Self::Ceo => ApplicationStatus::PendingCeo,
        }
    }

    /// Returns the string representation of the stage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FieldOfficer => "field_officer",
            Self::Manager => "manager",
            Self::Director => "director",
            Self::Chairperson => "chairperson",
            Self::Ceo => "ceo",
        }
    }

    /// Parses a stage (or staff role) from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "field_officer" => Some(Self::FieldOfficer),
            "manager" => Some(Self::Manager),
            "director" => Some(Self::Director),
            "chairperson" => Some(Self::Chairperson),
            "ceo" => Some(Self::Ceo),
            _ => None,
        }
    }
}

impl fmt::Display for ApprovalStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A decision submitted at a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    /// Approve at the current stage.
    Approve,
    /// Reject the application (terminal at any stage).
    Reject,
}

impl Decision {
    /// Returns the string representation of the decision.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }

    /// Parses a decision from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "approve" => Some(Self::Approve),
            "reject" => Some(Self::Reject),
            _ => None,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Terminal outcome of a workflow, reported to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinalResult {
    /// The application was approved at the CEO stage.
    Successful,
    /// The application was rejected at some stage.
    Failed,
}

impl FinalResult {
    /// Returns the string representation of the result.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Successful => "SUCCESSFUL",
            Self::Failed => "FAILED",
        }
    }
}

impl fmt::Display for FinalResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_str() {
        assert_eq!(ApplicationStatus::Submitted.as_str(), "submitted");
        assert_eq!(ApplicationStatus::PendingManager.as_str(), "pending_manager");
        assert_eq!(ApplicationStatus::PendingDirector.as_str(), "pending_director");
        assert_eq!(
            ApplicationStatus::PendingChairperson.as_str(),
            "pending_chairperson"
        );
        assert_eq!(ApplicationStatus::PendingCeo.as_str(), "pending_ceo");
        assert_eq!(ApplicationStatus::Approved.as_str(), "approved");
        assert_eq!(ApplicationStatus::Rejected.as_str(), "rejected");
    }

    #[test]
    fn test_status_parse_roundtrip() {
        for status in [
            ApplicationStatus::Submitted,
            ApplicationStatus::PendingManager,
            ApplicationStatus::PendingDirector,
            ApplicationStatus::PendingChairperson,
            ApplicationStatus::PendingCeo,
            ApplicationStatus::Approved,
            ApplicationStatus::Rejected,
        ] {
            assert_eq!(ApplicationStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ApplicationStatus::parse("PENDING_CEO"), Some(ApplicationStatus::PendingCeo));
        assert_eq!(ApplicationStatus::parse("invalid"), None);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(ApplicationStatus::Approved.is_terminal());
        assert!(ApplicationStatus::Rejected.is_terminal());
        assert!(!ApplicationStatus::Submitted.is_terminal());
        assert!(!ApplicationStatus::PendingManager.is_terminal());
        assert!(!ApplicationStatus::PendingCeo.is_terminal());
    }

    #[test]
    fn test_stage_order() {
        assert!(ApprovalStage::FieldOfficer < ApprovalStage::Manager);
        assert!(ApprovalStage::Manager < ApprovalStage::Director);
        assert!(ApprovalStage::Director < ApprovalStage::Chairperson);
        assert!(ApprovalStage::Chairperson < ApprovalStage::Ceo);
    }

    #[test]
    fn test_stage_next_walks_the_order() {
        let mut stage = ApprovalStage::FieldOfficer;
        let mut walked = vec![stage];
        while let Some(next) = stage.next() {
            walked.push(next);
            stage = next;
        }
        assert_eq!(walked, ApprovalStage::ORDER);
    }

    #[test]
    fn test_ceo_has_no_next_stage() {
        assert_eq!(ApprovalStage::Ceo.next(), None);
    }

    #[test]
    fn test_stage_pending_status() {
        assert_eq!(
            ApprovalStage::Manager.pending_status(),
            ApplicationStatus::PendingManager
        );
        assert_eq!(
            ApprovalStage::Ceo.pending_status(),
            ApplicationStatus::PendingCeo
        );
    }

    #[test]
    fn test_stage_parse() {
        assert_eq!(
            ApprovalStage::parse("field_officer"),
            Some(ApprovalStage::FieldOfficer)
        );
        assert_eq!(ApprovalStage::parse("Manager"), Some(ApprovalStage::Manager));
        assert_eq!(ApprovalStage::parse("ceo"), Some(ApprovalStage::Ceo));
        assert_eq!(ApprovalStage::parse("viewer"), None);
    }

    #[test]
    fn test_decision_parse() {
        assert_eq!(Decision::parse("approve"), Some(Decision::Approve));
        assert_eq!(Decision::parse("REJECT"), Some(Decision::Reject));
        assert_eq!(Decision::parse("defer"), None);
    }

    #[test]
    fn test_final_result_display() {
        assert_eq!(FinalResult::Successful.to_string(), "SUCCESSFUL");
        assert_eq!(FinalResult::Failed.to_string(), "FAILED");
    }
}
