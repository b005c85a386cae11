//! Core types for Stash
//!
//! Shared vocabulary for the storage and executor crates:
//! - Byte keys and values ([`Key`], [`Value`], [`KvPair`])
//! - Resource handles ([`BatchId`], [`IteratorId`])
//! - Caller identity ([`CallerContext`])
//! - Module configuration ([`StorageConfig`])

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod types;

pub use config::{ConfigError, StorageConfig};
pub use types::{BatchId, CallerContext, IteratorId, Key, KvPair, Value};
