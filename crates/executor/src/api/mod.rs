//! High-level typed wrapper for the Executor.
//!
//! [`Stash`] wraps an [`Executor`] and a [`CallerContext`] and turns the
//! [`Command`]/[`Output`] protocol into typed method calls.
//!
//! # Example
//!
//! ```
//! use stash_executor::Stash;
//!
//! let db = Stash::ephemeral().unwrap();
//!
//! db.put(b"user:1", b"alice").unwrap();
//! assert_eq!(db.get(b"user:1").unwrap(), b"alice".to_vec());
//!
//! // Absent keys read as empty; `has` tells them apart
//! assert!(db.get(b"user:2").unwrap().is_empty());
//! assert!(!db.has(b"user:2").unwrap());
//! ```

mod batch;
mod iter;
mod kv;

pub use iter::PrefixIter;

use std::path::Path;
use std::sync::Arc;

use stash_core::{CallerContext, StorageConfig};
use stash_storage::{Engine, MemoryEngine};

use crate::{Command, Error, Executor, Output, Result, StorageModule};

/// High-level typed wrapper for storage operations.
///
/// Each method:
///
/// 1. Creates the appropriate [`Command`]
/// 2. Executes it via the [`Executor`] under this handle's [`CallerContext`]
/// 3. Extracts and returns the typed result
///
/// Handles are cheap to clone; clones share the module and the batch
/// session.
#[derive(Debug, Clone)]
pub struct Stash {
    executor: Executor,
    context: CallerContext,
}

impl Stash {
    /// Open a persistent store in the directory `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(&StorageConfig::new(path.as_ref()))
    }

    /// Open a persistent store described by `config`
    pub fn open_with_config(config: &StorageConfig) -> Result<Self> {
        let module = Arc::new(StorageModule::new());
        module.init(config)?;
        Ok(Self::from_module(module))
    }

    /// Serve an already constructed engine
    pub fn with_engine(engine: Arc<dyn Engine>) -> Result<Self> {
        let module = Arc::new(StorageModule::new());
        module.init_with_engine(engine)?;
        Ok(Self::from_module(module))
    }

    /// In-memory store, lost on close
    pub fn ephemeral() -> Result<Self> {
        Self::with_engine(Arc::new(MemoryEngine::new()))
    }

    /// Wrap a module the host already initialized
    pub fn from_module(module: Arc<StorageModule>) -> Self {
        Self {
            executor: Executor::new(module),
            context: CallerContext::new(),
        }
    }

    /// Same module, different caller identity
    pub fn with_context(&self, context: CallerContext) -> Self {
        Self {
            executor: self.executor.clone(),
            context,
        }
    }

    /// Get the underlying executor.
    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    /// The identity attached to every command from this handle
    pub fn context(&self) -> &CallerContext {
        &self.context
    }

    /// Release the engine.
    ///
    /// Affects every handle sharing the module. Closing twice is fine.
    pub fn close(&self) -> Result<()> {
        match self.run(Command::Close)? {
            Output::Unit => Ok(()),
            _ => Err(Error::Internal {
                reason: "Unexpected output for Close".into(),
            }),
        }
    }

    fn run(&self, cmd: Command) -> Result<Output> {
        self.executor.execute(&self.context, cmd)
    }
}
