//! Executor error types
//!
//! Every failure reaching the caller is one of these variants. Each maps to a
//! canonical code (see [`Error::code`]) used by the wire envelope:
//!
//! | Code | Raised for |
//! |------|------------|
//! | InvalidArgument | bad parameter count or shape, stale batch, released iterator |
//! | UnknownCommand | unrecognized command name |
//! | EngineFailure | I/O or internal engine failure, batch rejection |
//! | LifecycleError | engine failed to open, command on an inactive module |
//! | Internal | unexpected output shape (bug) |
//!
//! A missing key is not an error anywhere in this crate.

use stash_storage::StorageError;
use thiserror::Error;

/// Errors returned by command execution
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A parameter is missing, surplus, or has the wrong shape, or a handle
    /// no longer refers to a live resource
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong
        reason: String,
    },

    /// The command name is not part of the protocol
    #[error("unknown command: {command}")]
    UnknownCommand {
        /// The name that was received
        command: String,
    },

    /// The engine failed the operation
    #[error("engine failure: {reason}")]
    EngineFailure {
        /// Engine-reported cause
        reason: String,
    },

    /// The module is not usable (never initialized, failed to open, or closed)
    #[error("lifecycle error: {reason}")]
    Lifecycle {
        /// Why the module cannot serve the call
        reason: String,
    },

    /// Internal error (bug or invariant violation)
    #[error("internal error: {reason}")]
    Internal {
        /// Error message
        reason: String,
    },
}

/// Result type for executor operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for [`Error::InvalidArgument`]
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Error::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`Error::Lifecycle`]
    pub fn lifecycle(reason: impl Into<String>) -> Self {
        Error::Lifecycle {
            reason: reason.into(),
        }
    }

    /// Canonical error code
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidArgument { .. } => "InvalidArgument",
            Error::UnknownCommand { .. } => "UnknownCommand",
            Error::EngineFailure { .. } => "EngineFailure",
            Error::Lifecycle { .. } => "LifecycleError",
            Error::Internal { .. } => "Internal",
        }
    }

    /// Check if this is an argument validation failure
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument { .. })
    }

    /// Check if this is an engine failure
    pub fn is_engine_failure(&self) -> bool {
        matches!(self, Error::EngineFailure { .. })
    }

    /// Check if this is a lifecycle failure
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, Error::Lifecycle { .. })
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Error::EngineFailure {
            reason: e.to_string(),
        }
    }
}
