//! Core business logic for Mikopo.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and state transitions live here.
//!
//! # Modules
//!
//! - `workflow` - Multi-stage loan approval state machine
//! - `auth` - Password hashing

pub mod auth;
pub mod workflow;
