//! # quaggakit
//!
//! Quagga routing daemon configuration through `vtysh`.
//!
//! This crate provides:
//! - A [`Backend`](backend::Backend) abstraction over the vtysh console
//! - Resource kinds for OSPF, BGP address families, PIM and route-maps
//! - A [`Client`] that plugs the console into the `blockconf` reconciler
//!
//! ## Example
//!
//! ```no_run
//! use blockconf::DesiredState;
//! use quaggakit::{Client, kinds::OspfKind};
//!
//! let client = Client::new().expect("vtysh not available");
//! let reconciler = client.reconciler().expect("read failed");
//!
//! let desired = DesiredState::present("ospf").with_property("opaque", true);
//! let diff = reconciler.plan(&OspfKind, &desired).expect("plan failed");
//! for command in diff.plan.commands() {
//!     println!("{command}");
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod error;
pub mod kinds;

pub use error::{Error, ErrorCategory, Result};

use backend::{Backend, vtysh::VtyshBackend};
use blockconf::{BlockKind, CommandOutput, Console, Reconciler, ResourceRecord, RUNNING_CONFIG};
use std::path::Path;

/// High-level client for a Quagga router.
///
/// The client wraps a backend and implements [`Console`] so the engine can
/// read the running configuration and push command batches through it.
pub struct Client {
    backend: Box<dyn Backend>,
}

impl Client {
    /// Create a new Client with the default backend.
    ///
    /// Returns an error if vtysh is not installed.
    pub fn new() -> Result<Self> {
        let backend = VtyshBackend::new()?;
        Ok(Self {
            backend: Box::new(backend),
        })
    }

    /// Create a client for an explicit vtysh executable.
    pub fn with_vtysh(path: impl AsRef<Path>) -> Result<Self> {
        let backend = VtyshBackend::with_path(path)?;
        Ok(Self {
            backend: Box::new(backend),
        })
    }

    /// Create a client with a custom backend (useful for testing).
    pub fn with_backend(backend: Box<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Check if the daemons answer.
    pub fn is_available(&self) -> bool {
        self.backend.is_available()
    }

    /// Fetch the running configuration.
    pub fn running_config(&self) -> Result<String> {
        self.backend.show(RUNNING_CONFIG)
    }

    /// Start a reconciliation cycle from one read of the running configuration.
    pub fn reconciler(&self) -> Result<Reconciler> {
        Ok(Reconciler::from_config(self.running_config()?))
    }

    /// Every record of a kind as currently configured.
    pub fn records(&self, kind: &dyn BlockKind) -> Result<Vec<ResourceRecord>> {
        Ok(self.reconciler()?.records(kind)?)
    }
}

impl Console for Client {
    fn read(&self, query: &str) -> blockconf::Result<String> {
        Ok(self.backend.show(query)?)
    }

    fn exec(&self, commands: &[String]) -> blockconf::Result<CommandOutput> {
        Ok(self.backend.run(commands)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockconf::{execute_simple, DesiredState, Existence, ExecuteOptions};
    use crate::kinds::{OspfKind, PimRouterKind, RouteMapKind};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct MockBackend {
        config: String,
        reject: bool,
        batches: Arc<Mutex<Vec<Vec<String>>>>,
    }

    impl Backend for MockBackend {
        fn is_available(&self) -> bool {
            true
        }

        fn show(&self, query: &str) -> Result<String> {
            if query == RUNNING_CONFIG {
                Ok(self.config.clone())
            } else {
                Err(Error::UnknownCommand {
                    command: query.to_string(),
                })
            }
        }

        fn run(&self, commands: &[String]) -> Result<CommandOutput> {
            self.batches.lock().unwrap().push(commands.to_vec());
            let stdout = if self.reject {
                b"% Unknown command.\n".to_vec()
            } else {
                Vec::new()
            };
            Ok(CommandOutput {
                stdout,
                stderr: Vec::new(),
                success: !self.reject,
            })
        }
    }

    fn client(config: &str) -> (Client, Arc<Mutex<Vec<Vec<String>>>>) {
        let backend = MockBackend {
            config: config.to_string(),
            ..Default::default()
        };
        let batches = Arc::clone(&backend.batches);
        (Client::with_backend(Box::new(backend)), batches)
    }

    #[test]
    fn test_records_through_client() {
        let (client, _) = client("route-map A permit 10\n match tag 5\n!\n");
        let records = client.records(&RouteMapKind).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].identity, "A 10");

        let ospf = client.records(&OspfKind).unwrap();
        assert_eq!(ospf[0].existence, Existence::Absent);
    }

    #[test]
    fn test_console_read_errors_map_to_engine() {
        let (client, _) = client("");
        let err = client.read("show bogus").unwrap_err();
        assert!(err.is_console());
    }

    #[test]
    fn test_apply_through_client() {
        let (client, batches) = client("hostname r1\n");
        let reconciler = Reconciler::read(&client).unwrap();
        let diff = reconciler
            .plan(
                &PimRouterKind,
                &DesiredState::present("pim").with_property("ip_multicast_routing", true),
            )
            .unwrap();

        let summary = execute_simple(&client, &[diff], ExecuteOptions::default()).unwrap();
        assert!(summary.is_success());

        let batches = batches.lock().unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(
            batches[0],
            [
                "configure terminal",
                "ip multicast-routing",
                "end",
                "write memory"
            ]
        );
    }

    #[test]
    fn test_rejected_batch_fails_summary() {
        let backend = MockBackend {
            config: "hostname r1\n".to_string(),
            reject: true,
            ..Default::default()
        };
        let client = Client::with_backend(Box::new(backend));
        let reconciler = client.reconciler().unwrap();
        let diff = reconciler
            .plan(&OspfKind, &DesiredState::present("ospf"))
            .unwrap();

        let summary = execute_simple(&client, &[diff], ExecuteOptions::default()).unwrap();
        assert!(!summary.is_success());
        assert_eq!(summary.failed, 1);
    }
}
