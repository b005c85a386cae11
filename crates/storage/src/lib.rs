//! Storage layer for Stash
//!
//! This crate defines the engine contract consumed by the storage module
//! and the engines that satisfy it:
//! - [`Engine`]: put/get/has/delete, atomic batch writes, prefix scans, close
//! - [`WriteBatch`]: ordered puts and deletes applied as one unit
//! - [`RedbEngine`]: persistent engine on top of redb
//! - [`MemoryEngine`]: ephemeral BTreeMap engine

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod batch;
pub mod engine;
pub mod error;
pub mod memory;
pub mod persistent;

pub use batch::{BatchOp, WriteBatch};
pub use engine::{prefix_upper_bound, Engine, PrefixScan};
pub use error::{Result, StorageError};
pub use memory::MemoryEngine;
pub use persistent::{RedbEngine, DB_FILE_NAME, SCAN_PAGE_SIZE};
