//! Write batches
//!
//! A [`WriteBatch`] is an ordered list of puts and deletes that an engine
//! applies as one atomic unit. Operations apply in insertion order, so when a
//! key appears more than once the last operation for that key wins.

use stash_core::{Key, Value};

/// A single queued write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOp {
    /// Store `value` under `key`
    Put {
        /// Target key
        key: Key,
        /// Value to store
        value: Value,
    },
    /// Remove `key` if present
    Delete {
        /// Target key
        key: Key,
    },
}

impl BatchOp {
    /// The key this operation touches
    pub fn key(&self) -> &[u8] {
        match self {
            BatchOp::Put { key, .. } | BatchOp::Delete { key } => key,
        }
    }
}

/// Ordered set of pending writes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    ops: Vec<BatchOp>,
}

impl WriteBatch {
    /// Create an empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a put
    pub fn put(&mut self, key: impl Into<Key>, value: impl Into<Value>) {
        self.ops.push(BatchOp::Put {
            key: key.into(),
            value: value.into(),
        });
    }

    /// Queue a delete
    pub fn delete(&mut self, key: impl Into<Key>) {
        self.ops.push(BatchOp::Delete { key: key.into() });
    }

    /// Number of queued operations
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Check if nothing is queued
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Queued operations in insertion order
    pub fn ops(&self) -> &[BatchOp] {
        &self.ops
    }

    /// Drop every queued operation
    pub fn clear(&mut self) {
        self.ops.clear();
    }
}

impl IntoIterator for WriteBatch {
    type Item = BatchOp;
    type IntoIter = std::vec::IntoIter<BatchOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}

impl<'a> IntoIterator for &'a WriteBatch {
    type Item = &'a BatchOp;
    type IntoIter = std::slice::Iter<'a, BatchOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}
