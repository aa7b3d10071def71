//! Error types for configuration-block reconciliation.
//!
//! Parsing tolerates configuration it does not understand, so there is no
//! error for an unrecognized line. Everything here is fatal for the resource
//! it was raised for.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Categories of reconciliation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    /// A captured value could not be decoded
    Parse,
    /// Parent context for a record could not be found
    Identity,
    /// The console read or exec failed
    Console,
    /// Desired state does not fit the field table
    Input,
}

impl ErrorCategory {
    /// Get a user-friendly description of this error category.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Parse => "Unreadable running configuration",
            Self::Identity => "Missing parent configuration block",
            Self::Console => "Console command failed",
            Self::Input => "Invalid desired state",
        }
    }
}

/// Errors raised while reading, planning or applying configuration.
#[derive(Debug, Error)]
pub enum Error {
    /// A child record's parent block is missing from the running configuration
    #[error("cannot resolve {kind} `{identity}`: no `{parent}` block found")]
    IdentityResolution {
        /// Resource kind being resolved
        kind: &'static str,
        /// Identity of the record
        identity: String,
        /// Description of the missing parent block
        parent: &'static str,
    },

    /// A captured value does not decode as the field's type
    #[error("line {line}: cannot decode `{raw}` as {expected} for field `{field}`")]
    TypeDecode {
        /// Field name
        field: &'static str,
        /// Raw captured text
        raw: String,
        /// Expected value type
        expected: &'static str,
        /// Line number in the configuration dump (1-indexed)
        line: usize,
    },

    /// A desired value has the wrong type for the field
    #[error("field `{field}` expects {expected}, got {got}")]
    TypeMismatch {
        /// Field name
        field: String,
        /// Expected value type
        expected: &'static str,
        /// Description of the value supplied
        got: String,
    },

    /// A field name is not part of the kind's table
    #[error("unknown field `{field}` for {kind}")]
    UnknownField {
        /// Resource kind
        kind: &'static str,
        /// Field name
        field: String,
    },

    /// A record lacks an attribute needed to build its block header
    #[error("{kind} `{identity}` is missing attribute `{attribute}`")]
    MissingAttribute {
        /// Resource kind
        kind: &'static str,
        /// Identity of the record
        identity: String,
        /// Attribute name
        attribute: &'static str,
    },

    /// The identity string does not have the shape the kind expects
    #[error("invalid {kind} identity `{identity}`")]
    InvalidIdentity {
        /// Resource kind
        kind: &'static str,
        /// Identity as supplied
        identity: String,
    },

    /// The console failed to run a query or a command batch
    #[error("console failure: {message}")]
    Console {
        /// What the console was asked to do
        message: String,
        /// Raw console output, if any
        output: String,
    },

    /// Asking the user for confirmation failed
    #[error("confirmation prompt failed: {0}")]
    Prompt(String),

    /// A field pattern does not compile
    #[error("invalid pattern for field `{field}`: {source}")]
    Pattern {
        /// Field name
        field: &'static str,
        /// Regex compilation error
        #[source]
        source: regex::Error,
    },
}

impl Error {
    /// Get the error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::TypeDecode { .. } => ErrorCategory::Parse,
            Error::IdentityResolution { .. } => ErrorCategory::Identity,
            Error::Console { .. } => ErrorCategory::Console,
            Error::TypeMismatch { .. }
            | Error::UnknownField { .. }
            | Error::MissingAttribute { .. }
            | Error::InvalidIdentity { .. }
            | Error::Prompt(_)
            | Error::Pattern { .. } => ErrorCategory::Input,
        }
    }

    /// Whether the failure came from the console rather than from planning.
    pub fn is_console(&self) -> bool {
        self.category() == ErrorCategory::Console
    }

    /// Build a console error from a failed command batch.
    pub fn console(message: impl Into<String>, output: impl Into<String>) -> Self {
        Error::Console {
            message: message.into(),
            output: output.into(),
        }
    }
}

/// Result type for reconciliation operations.
pub type Result<T> = std::result::Result<T, Error>;
