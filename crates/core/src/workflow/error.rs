//! Workflow error types for loan approval processing.
//!
//! This module defines all error types that can occur while acting on
//! an approval workflow: stage authorization, transition validity,
//! and persistence failures.

use thiserror::Error;
use uuid::Uuid;

use crate::workflow::types::{ApplicationStatus, ApprovalStage};

/// Errors that can occur during workflow operations.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Actor's role does not match the stage awaiting a decision.
    #[error("Role {acting_role} cannot act at the {expected_stage} stage")]
    UnauthorizedStage {
        /// The acting user's role string.
        acting_role: String,
        /// The stage currently awaiting a decision.
        expected_stage: ApprovalStage,
    },

    /// Decision submitted against an application that accepts none.
    #[error("Application in status {status} accepts no further decisions")]
    InvalidTransition {
        /// The application's current status.
        status: ApplicationStatus,
    },

    /// Loan application not found.
    #[error("Loan application {0} not found")]
    ApplicationNotFound(Uuid),

    /// Persistence failure; the whole operation should be retried.
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl WorkflowError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::UnauthorizedStage { .. } => 403,
            Self::InvalidTransition { .. } => 400,
            Self::ApplicationNotFound(_) => 404,
            Self::Persistence(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::UnauthorizedStage { .. } => "UNAUTHORIZED_STAGE",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::ApplicationNotFound(_) => "APPLICATION_NOT_FOUND",
            Self::Persistence(_) => "PERSISTENCE_ERROR",
        }
    }
}
