//! Console and callback traits
//!
//! These traits keep the engine free of any particular console transport
//! or user interface.

use crate::error::Result;
use crate::types::{ApplyResult, CommandOutput};

/// A line-oriented router console.
///
/// Both operations may fail opaquely; the engine never retries.
pub trait Console {
    /// Run a read-only query and return its text.
    fn read(&self, query: &str) -> Result<String>;

    /// Run an ordered command list in one invocation.
    fn exec(&self, commands: &[String]) -> Result<CommandOutput>;
}

impl<C: Console + ?Sized> Console for &C {
    fn read(&self, query: &str) -> Result<String> {
        (**self).read(query)
    }

    fn exec(&self, commands: &[String]) -> Result<CommandOutput> {
        (**self).exec(commands)
    }
}

/// Progress callback for execution operations
///
/// Implement this trait to receive progress updates during execution.
pub trait ProgressCallback {
    /// Called when starting to apply a batch of resources
    fn on_batch_start(&mut self, count: usize);

    /// Called when starting to apply a single resource
    fn on_resource_start(&mut self, id: &str, description: &str);

    /// Called when a resource application completes
    fn on_resource_complete(&mut self, id: &str, result: &ApplyResult);

    /// Called when a batch completes
    fn on_batch_complete(&mut self);
}

/// Confirmation callback for user interaction
pub trait ConfirmCallback {
    /// Ask the user to confirm an action
    ///
    /// # Returns
    /// `true` if the user confirmed, `false` otherwise
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

/// No-op progress callback
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_batch_start(&mut self, _count: usize) {}
    fn on_resource_start(&mut self, _id: &str, _description: &str) {}
    fn on_resource_complete(&mut self, _id: &str, _result: &ApplyResult) {}
    fn on_batch_complete(&mut self) {}
}

/// Auto-confirm callback (always returns true)
pub struct AutoConfirm;

impl ConfirmCallback for AutoConfirm {
    fn confirm(&mut self, _prompt: &str) -> Result<bool> {
        Ok(true)
    }
}

/// Auto-decline callback (always returns false)
pub struct AutoDecline;

impl ConfirmCallback for AutoDecline {
    fn confirm(&mut self, _prompt: &str) -> Result<bool> {
        Ok(false)
    }
}
