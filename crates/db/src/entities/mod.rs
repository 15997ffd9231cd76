//! `SeaORM` entity definitions.

pub mod approval_workflows;
pub mod loan_applications;
pub mod users;
