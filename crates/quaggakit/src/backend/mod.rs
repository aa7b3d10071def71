//! Backend abstraction for vtysh operations.
//!
//! The [`Backend`] trait defines the interface for talking to the routing
//! daemons, allowing for different implementations (real vtysh, mock for
//! testing).

pub mod vtysh;

use crate::error::Result;
use blockconf::CommandOutput;

/// Backend trait for console operations.
///
/// This trait abstracts the underlying console transport, enabling:
/// - Real CLI execution via the `vtysh` command
/// - Mock implementations for testing
pub trait Backend: Send + Sync {
    /// Check if the console is reachable.
    fn is_available(&self) -> bool;

    /// Run a read-only query (`show ...`) and return its text.
    fn show(&self, query: &str) -> Result<String>;

    /// Run a command list in one invocation.
    ///
    /// The returned output is marked unsuccessful when vtysh rejected any
    /// command, even if it exited cleanly.
    fn run(&self, commands: &[String]) -> Result<CommandOutput>;
}
