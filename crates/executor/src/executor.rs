//! The command dispatcher.

use std::sync::Arc;

use stash_core::CallerContext;
use tracing::debug;

use crate::command::{Command, Param};
use crate::handlers;
use crate::module::StorageModule;
use crate::wire;
use crate::{Output, Result};

/// Routes every [`Command`] to its handler
///
/// The executor is stateless: all state lives in the [`StorageModule`] it
/// wraps. It is cheap to clone and safe to share between threads; each
/// `execute` call blocks until its result is ready.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use stash_core::CallerContext;
/// use stash_executor::{Command, Executor, Output, StorageModule};
/// use stash_storage::MemoryEngine;
///
/// let module = Arc::new(StorageModule::new());
/// module.init_with_engine(Arc::new(MemoryEngine::new())).unwrap();
///
/// let executor = Executor::new(module);
/// let ctx = CallerContext::new();
///
/// executor
///     .execute(&ctx, Command::Put { key: b"k".to_vec(), value: b"v".to_vec() })
///     .unwrap();
/// let output = executor.execute(&ctx, Command::Get { key: b"k".to_vec() }).unwrap();
/// assert_eq!(output, Output::Value(b"v".to_vec()));
/// ```
#[derive(Debug, Clone)]
pub struct Executor {
    module: Arc<StorageModule>,
}

impl Executor {
    /// Create an executor over `module`
    pub fn new(module: Arc<StorageModule>) -> Self {
        Self { module }
    }

    /// The module this executor serves
    pub fn module(&self) -> &Arc<StorageModule> {
        &self.module
    }

    /// Execute a command
    pub fn execute(&self, ctx: &CallerContext, cmd: Command) -> Result<Output> {
        let name = cmd.name();
        debug!(caller = %ctx, command = name, write = cmd.is_write(), "dispatch");

        let result = self.dispatch(cmd);
        if let Err(e) = &result {
            debug!(caller = %ctx, command = name, code = e.code(), error = %e, "command failed");
        }
        result
    }

    /// Validate a named positional invocation, then execute it
    ///
    /// Arity and shape are checked before dispatch, so a rejected
    /// invocation has no side effect.
    pub fn execute_positional(
        &self,
        ctx: &CallerContext,
        name: &str,
        params: Vec<Param>,
    ) -> Result<Output> {
        let cmd = Command::from_positional(name, params).inspect_err(|e| {
            debug!(
                caller = %ctx,
                command = name,
                code = e.code(),
                error = %e,
                "invocation rejected"
            );
        })?;
        self.execute(ctx, cmd)
    }

    /// Execute a JSON envelope and return the JSON response
    ///
    /// See [`wire`] for the envelope format. Never fails: errors are encoded
    /// into the response.
    pub fn execute_json(&self, ctx: &CallerContext, request: &str) -> serde_json::Value {
        let result = wire::decode_invocation(request).and_then(|cmd| self.execute(ctx, cmd));
        wire::encode_response(&result)
    }

    fn dispatch(&self, cmd: Command) -> Result<Output> {
        // Close is the one command a non-active module accepts
        if matches!(cmd, Command::Close) {
            return self.close();
        }

        let engine = self.module.engine()?;
        let engine = engine.as_ref();
        let sessions = self.module.sessions();
        let iterators = self.module.iterators();

        match cmd {
            Command::Put { key, value } => handlers::kv::put(engine, &key, &value),
            Command::Get { key } => handlers::kv::get(engine, &key),
            Command::Has { key } => handlers::kv::has(engine, &key),
            Command::Delete { key } => handlers::kv::delete(engine, &key),

            Command::NewBatch => handlers::batch::new_batch(sessions),
            Command::BatchPut { batch, key, value } => {
                handlers::batch::batch_put(sessions, batch, key, value)
            }
            Command::BatchDelete { batch, key } => {
                handlers::batch::batch_delete(sessions, batch, key)
            }
            Command::BatchCommit { batch } => {
                handlers::batch::batch_commit(sessions, engine, batch)
            }

            Command::NewIterator { prefix } => {
                handlers::iterator::new_iterator(&self.module, &prefix)
            }
            Command::IteratorNext { iterator } => {
                handlers::iterator::iterator_next(iterators, iterator)
            }
            Command::IteratorRelease { iterator } => {
                handlers::iterator::iterator_release(iterators, iterator)
            }

            Command::Close => self.close(),
        }
    }

    fn close(&self) -> Result<Output> {
        self.module.close()?;
        Ok(Output::Unit)
    }
}
