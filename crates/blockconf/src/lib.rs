//! # Blockconf
//!
//! Reconciliation of indentation-delimited configuration blocks.
//!
//! Router daemons reachable only through a text console expose their state
//! as a "running configuration" dump. This crate parses the blocks of that
//! dump into typed records, compares them with declared state and plans the
//! console commands that converge the two, leaving unrelated sections alone.
//!
//! ## Core Concepts
//!
//! - **FieldTable**: per-kind table of field descriptors (pattern, type,
//!   default, command template); its order is the command emission order
//! - **BlockKind**: how a kind's blocks start, nest and are re-entered
//! - **ResourceRecord**: one fully defaulted, materialized block
//! - **Reconciler**: one read of the running configuration, then a
//!   [`ResourceDiff`] per declared resource
//! - **execute**: sends each diff's [`CommandPlan`] in a single console call
//!
//! ## Example
//!
//! ```ignore
//! use blockconf::{DesiredState, ExecuteOptions, Reconciler, execute_simple};
//!
//! let reconciler = Reconciler::read(&console)?;
//! let desired = DesiredState::present("ospf").with_property("opaque", true);
//! let diff = reconciler.plan(&OspfKind, &desired)?;
//!
//! for command in diff.plan.commands() {
//!     println!("{command}");
//! }
//!
//! let summary = execute_simple(&console, &[diff], ExecuteOptions::default())?;
//! ```
//!
//! ## Provider Traits
//!
//! - [`Console`]: reads queries and runs command batches on the device
//! - [`ProgressCallback`]: receives progress updates
//! - [`ConfirmCallback`]: handles user confirmations

pub mod classify;
pub mod context;
pub mod descriptor;
pub mod diff;
pub mod error;
pub mod executor;
pub mod materialize;
pub mod parents;
pub mod planner;
pub mod resource;
pub mod types;
pub mod value;

// Re-export main types at crate root
pub use classify::{Classifier, LineEvent};
pub use context::{AutoConfirm, AutoDecline, ConfirmCallback, Console, NoProgress, ProgressCallback};
pub use descriptor::{
    negate, render, DefaultValue, FieldAccessor, FieldDescriptor, FieldSpec, FieldTable,
};
pub use diff::{group_by_kind, Action, ChangeSet, DiffSummary, FieldChange, ResourceDiff};
pub use error::{Error, ErrorCategory, Result};
pub use executor::{execute, execute_simple, Reconciler, RUNNING_CONFIG};
pub use materialize::{materialize, read_records};
pub use parents::ParentIndex;
pub use planner::{plan_create, plan_delete, plan_replace, plan_update, CommandPlan};
pub use resource::{
    Attributes, BlockHeader, BlockKind, DesiredState, Existence, Layout, ResourceRecord, Teardown,
};
pub use types::{ApplyResult, CommandOutput, ExecuteOptions, ExecuteSummary};
pub use value::{Value, ValueType};
