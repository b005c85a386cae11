//! Batch session command handlers.

use stash_core::{BatchId, Key, Value};
use stash_storage::Engine;

use crate::session::SessionSlot;
use crate::{Output, Result};

/// Handle NewBatch command.
pub fn new_batch(sessions: &SessionSlot) -> Result<Output> {
    Ok(Output::Batch(sessions.reset()))
}

/// Handle BatchPut command.
pub fn batch_put(
    sessions: &SessionSlot,
    batch: Option<BatchId>,
    key: Key,
    value: Value,
) -> Result<Output> {
    sessions.put(batch, key, value)?;
    Ok(Output::Unit)
}

/// Handle BatchDelete command.
pub fn batch_delete(sessions: &SessionSlot, batch: Option<BatchId>, key: Key) -> Result<Output> {
    sessions.delete(batch, key)?;
    Ok(Output::Unit)
}

/// Handle BatchCommit command.
pub fn batch_commit(
    sessions: &SessionSlot,
    engine: &dyn Engine,
    batch: Option<BatchId>,
) -> Result<Output> {
    sessions.commit(batch, engine)?;
    Ok(Output::Unit)
}
