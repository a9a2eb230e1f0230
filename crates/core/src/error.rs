//! Error types for the keyspace facade
//!
//! All failures surfaced by the facade, the batch/transaction builders and
//! the reply conversions are represented by the [`Error`] enum. Errors are
//! cloneable so one executor failure can be delivered to every pending
//! result of a unit, and serializable so they survive SDK boundaries.
//!
//! | Category | Variants |
//! |----------|----------|
//! | Namespace | `UnsupportedInNamespace`, `InvariantViolation` |
//! | Misuse | `Programming` |
//! | Pending results | `Cancelled` |
//! | Executor | `Server`, `Connection` |
//! | Conversion | `UnexpectedReply` |
//! | Configuration | `Config` |
//!
//! A transaction whose conditions do not hold is not an error: it returns
//! `Ok(false)` from `execute`.

use serde::{Deserialize, Serialize};

/// Result type alias for keyspace operations
pub type Result<T> = std::result::Result<T, Error>;

/// Keyspace errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum Error {
    // ==================== Namespace ====================
    /// The command would return or require a key outside the prefixed namespace
    #[error("{command} is not supported inside a key namespace")]
    UnsupportedInNamespace {
        /// Name of the rejected command
        command: String,
    },

    /// A key crossed the namespace boundary without the expected prefix
    #[error("invariant violation: {reason}")]
    InvariantViolation {
        /// What crossed the boundary
        reason: String,
    },

    // ==================== Misuse ====================
    /// Client misuse: nested units, double execute, queuing after submit,
    /// or argument metadata that does not fit the command
    #[error("programming error: {reason}")]
    Programming {
        /// What was misused
        reason: String,
    },

    // ==================== Pending results ====================
    /// The pending result belonged to a unit that did not commit
    #[error("pending result was cancelled")]
    Cancelled,

    // ==================== Executor ====================
    /// Error reply produced by the store
    #[error("server error: {message}")]
    Server {
        /// The store's error text, unchanged
        message: String,
    },

    /// Transport failure reported by the executor
    #[error("connection error: {reason}")]
    Connection {
        /// Transport detail from the executor
        reason: String,
    },

    // ==================== Conversion ====================
    /// Reply shape did not match the requested result type
    #[error("unexpected reply: expected {expected}, got {actual}")]
    UnexpectedReply {
        /// Result type that was requested
        expected: String,
        /// Kind of reply that arrived
        actual: String,
    },

    // ==================== Configuration ====================
    /// Invalid configuration
    #[error("invalid config: {reason}")]
    Config {
        /// Why the config was refused
        reason: String,
    },
}

impl Error {
    /// Build a [`Error::Programming`] error.
    pub fn programming(reason: impl Into<String>) -> Self {
        Error::Programming {
            reason: reason.into(),
        }
    }

    /// Build a [`Error::InvariantViolation`] error.
    pub fn invariant(reason: impl Into<String>) -> Self {
        Error::InvariantViolation {
            reason: reason.into(),
        }
    }

    /// Build a [`Error::UnexpectedReply`] error.
    pub fn unexpected(expected: impl Into<String>, actual: impl std::fmt::Debug) -> Self {
        Error::UnexpectedReply {
            expected: expected.into(),
            actual: format!("{:?}", actual),
        }
    }

    /// Whether the error originated in the executor rather than in this layer.
    pub fn is_executor_error(&self) -> bool {
        matches!(self, Error::Server { .. } | Error::Connection { .. })
    }
}
