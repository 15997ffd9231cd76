//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod loan;
pub mod user;
pub mod workflow;

pub use loan::{CreateLoanInput, LoanFilter, LoanRepository};
pub use user::UserRepository;
pub use workflow::{DecisionRecord, WorkflowRepository};
