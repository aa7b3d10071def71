//! Reconciliation front end for vtysync
//!
//! The engine orchestrates:
//! 1. Diffing - Plan every declared resource against one running-config read
//! 2. Executing - Confirm, then push each resource's commands through vtysh

pub mod differ;
pub mod executor;

pub use differ::{Target, compute_diffs, display_diff};
pub use executor::{ExecuteOptions, execute};
