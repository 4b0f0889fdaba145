//! Common utilities and shared types for the ringscan workspace.
//!
//! This crate provides the search configuration and the scenario fixtures
//! used across the ringscan project.

mod config;
mod test_cases;

pub use crate::config::*;
pub use crate::test_cases::*;
