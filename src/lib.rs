//! # Stash
//!
//! Command-driven ordered key-value storage module.
//!
//! Stash puts a small closed command protocol in front of a persistent
//! ordered key-value engine: single-key reads and writes, an atomic batch
//! session, and prefix iteration.
//!
//! ## Quick Start
//!
//! ```no_run
//! use stash::prelude::*;
//!
//! # fn main() -> stash::Result<()> {
//! // Open a store in a directory
//! let db = Stash::open("./my-store")?;
//!
//! // Key-value operations
//! db.put(b"user:1", b"Alice")?;
//! assert_eq!(db.get(b"user:1")?, b"Alice".to_vec());
//!
//! // Atomic batches
//! let batch = db.new_batch()?;
//! db.batch_put(batch, b"user:2", b"Bob")?;
//! db.batch_delete(batch, b"user:1")?;
//! db.batch_commit(batch)?;
//!
//! // Prefix iteration
//! for pair in db.scan_prefix(b"user:")? {
//!     let (key, value) = pair?;
//!     println!("{:?} = {:?}", key, value);
//! }
//!
//! // Graceful shutdown
//! db.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Layers
//!
//! - [`stash_core`]: identifiers, caller context, configuration
//! - [`stash_storage`]: the [`Engine`] contract, `redb` and in-memory engines
//! - [`stash_executor`]: commands, dispatcher, lifecycle, JSON envelope,
//!   typed API
//!
//! Hosts that drive the module through commands compose it explicitly:
//!
//! ```no_run
//! use std::sync::Arc;
//! use stash::{CallerContext, Command, Executor, StorageConfig, StorageModule};
//!
//! # fn main() -> stash::Result<()> {
//! let module = Arc::new(StorageModule::new());
//! module.init(&StorageConfig::new("./my-store"))?;
//!
//! let executor = Executor::new(module.clone());
//! executor.execute(&CallerContext::new(), Command::NewBatch)?;
//!
//! module.close()?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod prelude;

pub use stash_core::{
    BatchId, CallerContext, ConfigError, IteratorId, Key, KvPair, StorageConfig, Value,
};
pub use stash_executor::{
    wire, Command, Error, Executor, ModuleStatus, Output, Param, PrefixIter, Result, Stash,
    StorageModule, COMMAND_NAMES,
};
pub use stash_storage::{
    BatchOp, Engine, MemoryEngine, PrefixScan, RedbEngine, Result as StorageResult, StorageError,
    WriteBatch,
};
