//! Open prefix cursors
//!
//! Each `NewIterator` registers an engine [`PrefixScan`] under a fresh
//! [`IteratorId`]. The cursor stays registered until the caller releases
//! it or the module closes. An exhausted cursor keeps yielding `None`
//! until released; a released or unknown id is an invalid argument.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use stash_core::{IteratorId, KvPair};
use stash_storage::PrefixScan;

use crate::{Error, Result};

struct Cursor {
    scan: Box<dyn PrefixScan>,
    exhausted: bool,
}

/// Registry of the module's open cursors
pub struct IteratorRegistry {
    next_id: AtomicU64,
    open: Mutex<HashMap<IteratorId, Arc<Mutex<Cursor>>>>,
}

impl IteratorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            open: Mutex::new(HashMap::new()),
        }
    }

    /// Register a scan and return its handle
    pub fn register(&self, scan: Box<dyn PrefixScan>) -> IteratorId {
        let id = IteratorId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let cursor = Cursor {
            scan,
            exhausted: false,
        };
        self.open.lock().insert(id, Arc::new(Mutex::new(cursor)));
        id
    }

    /// Advance a cursor
    ///
    /// Only the cursor itself is locked while the engine produces the next
    /// pair; other cursors advance independently.
    pub fn next(&self, id: IteratorId) -> Result<Option<KvPair>> {
        let cursor = self
            .open
            .lock()
            .get(&id)
            .cloned()
            .ok_or_else(|| released(id))?;

        let mut cursor = cursor.lock();
        if cursor.exhausted {
            return Ok(None);
        }
        match cursor.scan.next() {
            Some(Ok(pair)) => Ok(Some(pair)),
            Some(Err(e)) => Err(Error::from(e)),
            None => {
                cursor.exhausted = true;
                Ok(None)
            }
        }
    }

    /// Release a cursor, freeing its engine-side resources
    pub fn release(&self, id: IteratorId) -> Result<()> {
        self.open
            .lock()
            .remove(&id)
            .map(drop)
            .ok_or_else(|| released(id))
    }

    /// Release every open cursor, returning how many there were
    pub fn release_all(&self) -> usize {
        let drained: Vec<_> = self.open.lock().drain().collect();
        drained.len()
    }

    /// Number of open cursors
    pub fn len(&self) -> usize {
        self.open.lock().len()
    }

    /// Check if no cursor is open
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for IteratorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for IteratorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IteratorRegistry")
            .field("open", &self.len())
            .finish()
    }
}

fn released(id: IteratorId) -> Error {
    Error::invalid_argument(format!("{} is released or unknown", id))
}
