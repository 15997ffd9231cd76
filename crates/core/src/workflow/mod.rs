//! Loan approval workflow for Mikopo.
//!
//! This module implements the multi-role approval chain for loan
//! applications: field officer, manager, director, chairperson, CEO.
//! A decision at each stage either advances the application to the
//! next stage or terminates it.
//!
//! # Modules
//!
//! - `types` - Workflow domain types (ApplicationStatus, ApprovalStage, Decision)
//! - `error` - Workflow-specific error types
//! - `engine` - Stage authorization and transition logic

pub mod engine;
pub mod error;
pub mod types;

#[cfg(test)]
mod engine_props;

pub use engine::{ApprovalEngine, DecisionOutcome};
pub use error::WorkflowError;
pub use types::{ApplicationStatus, ApprovalStage, Decision, FinalResult};
