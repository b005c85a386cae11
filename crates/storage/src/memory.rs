//! Ephemeral in-memory engine
//!
//! BTreeMap under a reader-writer lock. Reads share the lock, writes take it
//! exclusively, and a whole batch is applied under a single write guard, so
//! readers never observe half of a batch.
//!
//! Prefix scans copy the matching range when they are opened. That copy is
//! the scan's snapshot: later writes never show up in it.

use std::collections::BTreeMap;
use std::ops::Bound;

use parking_lot::RwLock;
use stash_core::{KvPair, Value};

use crate::batch::{BatchOp, WriteBatch};
use crate::engine::{prefix_upper_bound, Engine, PrefixScan};
use crate::error::{Result, StorageError};

/// In-memory ordered engine
///
/// Data lives only as long as the engine; nothing touches the disk.
///
/// # Example
///
/// ```ignore
/// use stash_storage::{Engine, MemoryEngine};
///
/// let engine = MemoryEngine::new();
/// engine.put(b"user:1", b"alice")?;
/// assert_eq!(engine.get(b"user:1")?, Some(b"alice".to_vec()));
/// ```
pub struct MemoryEngine {
    /// `None` once closed
    data: RwLock<Option<BTreeMap<Vec<u8>, Vec<u8>>>>,
}

impl MemoryEngine {
    /// Create a new empty engine
    pub fn new() -> Self {
        Self {
            data: RwLock::new(Some(BTreeMap::new())),
        }
    }

    /// Number of stored keys (0 once closed)
    pub fn len(&self) -> usize {
        self.data.read().as_ref().map(BTreeMap::len).unwrap_or(0)
    }

    /// Check if no keys are stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if the engine has been closed
    pub fn is_closed(&self) -> bool {
        self.data.read().is_none()
    }
}

impl Default for MemoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryEngine")
            .field("len", &self.len())
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Engine for MemoryEngine {
    fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        let mut guard = self.data.write();
        let map = guard.as_mut().ok_or(StorageError::Closed)?;
        map.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn get(&self, key: &[u8]) -> Result<Option<Value>> {
        let guard = self.data.read();
        let map = guard.as_ref().ok_or(StorageError::Closed)?;
        Ok(map.get(key).cloned())
    }

    fn has(&self, key: &[u8]) -> Result<bool> {
        let guard = self.data.read();
        let map = guard.as_ref().ok_or(StorageError::Closed)?;
        Ok(map.contains_key(key))
    }

    fn delete(&self, key: &[u8]) -> Result<()> {
        let mut guard = self.data.write();
        let map = guard.as_mut().ok_or(StorageError::Closed)?;
        map.remove(key);
        Ok(())
    }

    fn write(&self, batch: WriteBatch) -> Result<()> {
        let mut guard = self.data.write();
        let map = guard.as_mut().ok_or(StorageError::Closed)?;
        for op in batch {
            match op {
                BatchOp::Put { key, value } => {
                    map.insert(key, value);
                }
                BatchOp::Delete { key } => {
                    map.remove(&key);
                }
            }
        }
        Ok(())
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Result<Box<dyn PrefixScan>> {
        let guard = self.data.read();
        let map = guard.as_ref().ok_or(StorageError::Closed)?;

        let upper = match prefix_upper_bound(prefix) {
            Some(upper) => Bound::Excluded(upper),
            None => Bound::Unbounded,
        };
        let snapshot: Vec<KvPair> = map
            .range::<Vec<u8>, _>((Bound::Included(prefix.to_vec()), upper))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Ok(Box::new(snapshot.into_iter().map(Ok)))
    }

    fn close(&self) -> Result<()> {
        self.data.write().take();
        Ok(())
    }
}
