//! Convenient imports for Stash.
//!
//! ```no_run
//! use stash::prelude::*;
//!
//! let db = Stash::open("./my-store")?;
//! db.put(b"key", b"value")?;
//! # Ok::<(), stash::Error>(())
//! ```

// Main entry point
pub use crate::Stash;

// Error handling
pub use crate::{Error, Result};

// Core types
pub use crate::{BatchId, CallerContext, IteratorId, Key, KvPair, StorageConfig, Value};
