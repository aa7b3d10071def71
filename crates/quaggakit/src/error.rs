//! Error types for vtysh operations.
//!
//! vtysh reports most failures as `%`-prefixed lines on stdout rather than
//! through its exit status, so output is classified into categories that
//! tell the user whether the command, the configuration or the daemons are
//! at fault.

use thiserror::Error;

/// Categories of vtysh errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The daemon does not know the command
    UnknownCommand,
    /// The command is missing arguments
    Incomplete,
    /// The command prefix matches several commands
    Ambiguous,
    /// vtysh could not reach the routing daemons
    DaemonUnreachable,
    /// vtysh is not installed or not found
    VtyshNotFound,
    /// Parsing or planning failed before anything was sent
    Engine,
    /// Other/unknown errors
    Other,
}

impl ErrorCategory {
    /// Get a user-friendly description of this error category.
    pub fn description(&self) -> &'static str {
        match self {
            Self::UnknownCommand => "Command not recognized",
            Self::Incomplete => "Incomplete command",
            Self::Ambiguous => "Ambiguous command",
            Self::DaemonUnreachable => "Routing daemons unreachable",
            Self::VtyshNotFound => "vtysh not installed",
            Self::Engine => "Configuration could not be reconciled",
            Self::Other => "Unexpected error",
        }
    }

    /// Get actionable advice for resolving this error category.
    pub fn advice(&self) -> &'static str {
        match self {
            Self::UnknownCommand => {
                "Check that the protocol daemon is enabled and supports this command"
            }
            Self::Incomplete | Self::Ambiguous => "Check the values in the desired state file",
            Self::DaemonUnreachable => "Start zebra and the protocol daemons, then retry",
            Self::VtyshNotFound => "Install quagga or frr, or pass --vtysh <path>",
            Self::Engine => "Check the desired state against the running configuration",
            Self::Other => "Check the error details for more information",
        }
    }
}

/// Phrases vtysh uses when zebra or a protocol daemon is down.
const DAEMON_DOWN: &[&str] = &[
    "failed to connect",
    "exiting: failed",
    "connection refused",
    "is not running",
];

/// Errors that can occur while talking to vtysh.
#[derive(Debug, Error)]
pub enum Error {
    /// Parsing or planning error from the reconciliation engine
    #[error(transparent)]
    Engine(#[from] blockconf::Error),

    /// vtysh is not installed or not found in PATH
    #[error("vtysh not found. Install quagga or frr")]
    VtyshNotFound,

    /// The daemon rejected a command it does not know
    #[error("unknown command: {command}")]
    UnknownCommand {
        /// Offending command, as reported by vtysh
        command: String,
    },

    /// A command was missing arguments
    #[error("incomplete command: {output}")]
    IncompleteCommand {
        /// vtysh output
        output: String,
    },

    /// A command prefix matched several commands
    #[error("ambiguous command: {output}")]
    AmbiguousCommand {
        /// vtysh output
        output: String,
    },

    /// vtysh could not connect to the daemons
    #[error("cannot reach routing daemons: {message}")]
    DaemonUnreachable {
        /// vtysh output
        message: String,
    },

    /// Command execution failed
    #[error("command failed: {message}")]
    CommandFailed {
        /// Description of what command failed
        message: String,
        /// Output from the failed command
        output: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Get the error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Engine(_) => ErrorCategory::Engine,
            Error::VtyshNotFound => ErrorCategory::VtyshNotFound,
            Error::UnknownCommand { .. } => ErrorCategory::UnknownCommand,
            Error::IncompleteCommand { .. } => ErrorCategory::Incomplete,
            Error::AmbiguousCommand { .. } => ErrorCategory::Ambiguous,
            Error::DaemonUnreachable { .. } => ErrorCategory::DaemonUnreachable,
            Error::CommandFailed { .. } | Error::Io(_) => ErrorCategory::Other,
        }
    }

    /// Create an error from vtysh output.
    ///
    /// Only diagnostic lines (`%` or `Exiting:` at the start) are inspected,
    /// so configuration text such as descriptions never counts as an error.
    /// Returns `None` when the output carries no error marker.
    pub fn from_vtysh_output(output: &str) -> Option<Self> {
        for line in output.lines().map(str::trim) {
            let lower = line.to_lowercase();
            if !(lower.starts_with('%') || lower.starts_with("exiting:")) {
                continue;
            }
            if DAEMON_DOWN.iter().any(|marker| lower.contains(marker)) {
                return Some(Error::DaemonUnreachable {
                    message: line.to_string(),
                });
            }
            if lower.starts_with("% unknown command") {
                let command = line
                    .split_once(':')
                    .map_or_else(|| line.to_string(), |(_, c)| c.trim().to_string());
                return Some(Error::UnknownCommand { command });
            }
            if lower.starts_with("% invalid input") {
                return Some(Error::UnknownCommand {
                    command: line.to_string(),
                });
            }
            if lower.starts_with("% command incomplete") {
                return Some(Error::IncompleteCommand {
                    output: output.trim().to_string(),
                });
            }
            if lower.starts_with("% ambiguous command") {
                return Some(Error::AmbiguousCommand {
                    output: output.trim().to_string(),
                });
            }
        }

        None
    }

    /// Classify the output of a failed invocation.
    pub fn from_failed_output(message: impl Into<String>, output: &str) -> Self {
        Self::from_vtysh_output(output).unwrap_or_else(|| Error::CommandFailed {
            message: message.into(),
            output: output.trim().to_string(),
        })
    }
}

impl From<Error> for blockconf::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Engine(inner) => inner,
            Error::CommandFailed { message, output } => blockconf::Error::console(message, output),
            other => blockconf::Error::console(other.to_string(), String::new()),
        }
    }
}

/// Result type for vtysh operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_command() {
        let err = Error::from_vtysh_output("% Unknown command: ospf abr-type bogus\n").unwrap();
        assert_eq!(err.category(), ErrorCategory::UnknownCommand);
        assert_eq!(err.to_string(), "unknown command: ospf abr-type bogus");

        let err = Error::from_vtysh_output("% Unknown command.\n").unwrap();
        assert_eq!(err.category(), ErrorCategory::UnknownCommand);
    }

    #[test]
    fn test_incomplete_and_ambiguous() {
        let err = Error::from_vtysh_output("% Command incomplete.").unwrap();
        assert_eq!(err.category(), ErrorCategory::Incomplete);

        let err = Error::from_vtysh_output("line\n% Ambiguous command.").unwrap();
        assert_eq!(err.category(), ErrorCategory::Ambiguous);
    }

    #[test]
    fn test_daemon_unreachable() {
        let err =
            Error::from_vtysh_output("Exiting: failed to connect to any daemons.").unwrap();
        assert_eq!(err.category(), ErrorCategory::DaemonUnreachable);
        assert_eq!(
            err.category().advice(),
            "Start zebra and the protocol daemons, then retry"
        );
    }

    #[test]
    fn test_daemon_phrases_in_descriptions_are_config() {
        let config = "!\ninterface eth1\n description backup uplink, bgpd is not running here\n!\n\
                      router bgp 1\n neighbor 10.0.0.1 description connection refused lab\n!\n\
                      router ospf\n!\n";
        assert!(Error::from_vtysh_output(config).is_none());

        let err = Error::from_vtysh_output("% bgpd is not running\n").unwrap();
        assert_eq!(err.category(), ErrorCategory::DaemonUnreachable);
        assert_eq!(err.to_string(), "cannot reach routing daemons: % bgpd is not running");
    }

    #[test]
    fn test_clean_output() {
        assert!(Error::from_vtysh_output("router ospf\n ospf router-id 1.1.1.1\n").is_none());
        let err = Error::from_failed_output("vtysh exited with 1", "something odd");
        assert!(matches!(err, Error::CommandFailed { .. }));
    }

    #[test]
    fn test_into_engine_error() {
        let err: blockconf::Error = Error::VtyshNotFound.into();
        assert!(err.is_console());

        let inner = blockconf::Error::UnknownField {
            kind: "ospf",
            field: "colour".into(),
        };
        let err: blockconf::Error = Error::Engine(inner).into();
        assert!(matches!(err, blockconf::Error::UnknownField { .. }));
    }
}
