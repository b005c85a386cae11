//! Output enum: the result shape of every command.

use stash_core::{BatchId, IteratorId, KvPair, Value};

/// Successful result of a [`Command`](crate::Command)
///
/// | Command | Output |
/// |---------|--------|
/// | Put, Delete, BatchPut, BatchDelete, BatchCommit, Close, IteratorRelease | `Unit` |
/// | Get | `Value` |
/// | Has | `Bool` |
/// | NewBatch | `Batch` |
/// | NewIterator | `Iterator` |
/// | IteratorNext | `Entry` |
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// No result value
    Unit,

    /// Value read by `Get` (empty when the key is absent)
    Value(Value),

    /// Existence flag from `Has`
    Bool(bool),

    /// Handle of the session opened by `NewBatch`
    Batch(BatchId),

    /// Handle of the cursor opened by `NewIterator`
    Iterator(IteratorId),

    /// Next pair of a cursor, `None` once it is exhausted
    Entry(Option<KvPair>),
}
