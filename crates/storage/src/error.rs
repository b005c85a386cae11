//! Storage error types

use thiserror::Error;

/// Errors reported by an [`Engine`](crate::Engine)
///
/// Key absence is never an error at this layer; reads report it as `None`.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The engine has been closed
    #[error("engine is closed")]
    Closed,

    /// Filesystem failure while opening or preparing the engine
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal failure of the backing engine
    #[error("backend error: {0}")]
    Backend(String),

    /// The engine refused to apply a write batch; nothing was applied
    #[error("batch rejected: {0}")]
    BatchRejected(String),
}

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;

impl From<redb::Error> for StorageError {
    fn from(e: redb::Error) -> Self {
        match e {
            redb::Error::Io(io) => StorageError::Io(io),
            other => StorageError::Backend(other.to_string()),
        }
    }
}
