//! Command execution layer for Stash
//!
//! This crate turns the storage engine into a command-driven module:
//!
//! - [`Command`] / [`Output`]: the closed protocol, one variant per operation
//! - [`Executor`]: dispatches commands against a [`StorageModule`]
//! - [`StorageModule`]: owns the engine, the batch session, and open cursors
//! - [`wire`]: JSON envelope for untyped transports
//! - [`Stash`]: typed Rust API over the executor
//!
//! # Example
//!
//! ```
//! use stash_core::CallerContext;
//! use stash_executor::{Executor, Output, Param, Stash};
//!
//! let db = Stash::ephemeral().unwrap();
//! let executor: &Executor = db.executor();
//! let ctx = CallerContext::with_label("doc");
//!
//! executor
//!     .execute_positional(&ctx, "Put", vec![Param::from("k"), Param::from("v")])
//!     .unwrap();
//! assert_eq!(
//!     executor.execute_positional(&ctx, "Get", vec![Param::from("k")]).unwrap(),
//!     Output::Value(b"v".to_vec())
//! );
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod api;
mod command;
mod convert;
mod error;
mod executor;
mod iterators;
mod module;
mod output;
mod session;

pub mod handlers;
pub mod wire;


pub use api::{PrefixIter, Stash};
pub use command::{Command, Param, COMMAND_NAMES};
pub use error::{Error, Result};
pub use executor::Executor;
pub use iterators::IteratorRegistry;
pub use module::{ModuleStatus, StorageModule};
pub use output::Output;
pub use session::{BatchSession, SessionSlot, SessionState};

pub use stash_core::{BatchId, CallerContext, IteratorId, Key, KvPair, StorageConfig, Value};
