//! Core types for the storage module
//!
//! This module defines the fundamental types used throughout the system:
//! - [`Key`] / [`Value`]: opaque byte sequences
//! - [`BatchId`]: handle of a batch session
//! - [`IteratorId`]: handle of an open prefix cursor
//! - [`CallerContext`]: opaque per-call identity supplied by the transport

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored key. No size or encoding constraints; the empty key is valid.
pub type Key = Vec<u8>;

/// A stored value. No size or encoding constraints.
pub type Value = Vec<u8>;

/// A key together with its value, as produced by prefix scans.
pub type KvPair = (Key, Value);

/// Handle of a batch session
///
/// Returned by `NewBatch` and threaded through the batch commands. A handle
/// goes stale once a newer session replaces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BatchId(u64);

impl BatchId {
    /// Create a BatchId from its raw numeric form
    pub const fn new(raw: u64) -> Self {
        BatchId(raw)
    }

    /// Get the raw numeric form
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for BatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "batch#{}", self.0)
    }
}

/// Handle of an open prefix iterator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IteratorId(u64);

impl IteratorId {
    /// Create an IteratorId from its raw numeric form
    pub const fn new(raw: u64) -> Self {
        IteratorId(raw)
    }

    /// Get the raw numeric form
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for IteratorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "iter#{}", self.0)
    }
}

/// Opaque identity of the caller of a single command
///
/// The transport layer hands one of these to every invocation. Nothing in
/// the storage module depends on its contents; it is only recorded in log
/// spans so that interleaved calls can be told apart.
///
/// # Examples
///
/// ```
/// use stash_core::CallerContext;
///
/// let a = CallerContext::new();
/// let b = CallerContext::new();
/// assert_ne!(a.id(), b.id());
///
/// let labelled = CallerContext::with_label("ledger-sync");
/// assert_eq!(labelled.label(), Some("ledger-sync"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallerContext {
    id: Uuid,
    label: Option<String>,
}

impl CallerContext {
    /// Create a new anonymous context with a random id
    pub fn new() -> Self {
        CallerContext {
            id: Uuid::new_v4(),
            label: None,
        }
    }

    /// Create a context carrying a caller-supplied label
    pub fn with_label(label: impl Into<String>) -> Self {
        CallerContext {
            id: Uuid::new_v4(),
            label: Some(label.into()),
        }
    }

    /// Get the context id
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Get the caller-supplied label, if any
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

impl Default for CallerContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CallerContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{}({})", label, self.id),
            None => write!(f, "{}", self.id),
        }
    }
}
