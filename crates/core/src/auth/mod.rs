//! Authentication and password hashing.
//!
//! This module provides:
//! - Password hashing with Argon2id
//! - Password verification
//!
//! Staff roles are not defined here: a user's role is one of the five
//! approval stage names and lives in [`crate::workflow::ApprovalStage`].

mod password;

pub use password::{PasswordError, hash_password, verify_password};
