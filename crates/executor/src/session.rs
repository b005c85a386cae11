//! Batch sessions
//!
//! A module instance has exactly one active [`BatchSession`], held in a
//! [`SessionSlot`]. The slot's mutex is the session-scoped lock: every batch
//! command takes it, and `BatchCommit` holds it across the engine write, so
//! batch calls from concurrent callers are serialized instead of racing.
//!
//! ## State machine
//!
//! ```text
//!            BatchPut / BatchDelete
//!   Empty ─────────────────────────▶ Pending ──┐ BatchPut / BatchDelete
//!     ▲                                 │  ◀───┘
//!     │        BatchCommit (engine ok)  │
//!     ├──────────── Committed ◀─────────┤
//!     │                                 │
//!     │     BatchCommit (engine error)  │
//!     └──────────── Aborted ◀───────────┘
//! ```
//!
//! `NewBatch` replaces the session outright: queued operations are dropped
//! and the old [`BatchId`] goes stale. It never merges with the previous
//! session. Committing an `Empty` session succeeds without touching the
//! engine.

use parking_lot::Mutex;
use stash_core::{BatchId, Key, Value};
use stash_storage::{Engine, WriteBatch};
use tracing::{debug, warn};

use crate::{Error, Result};

/// Observable state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing queued
    Empty,
    /// At least one operation queued
    Pending,
}

/// Ordered pending writes identified by a [`BatchId`]
#[derive(Debug)]
pub struct BatchSession {
    id: BatchId,
    pending: WriteBatch,
}

impl BatchSession {
    /// Create an empty session
    pub fn new(id: BatchId) -> Self {
        Self {
            id,
            pending: WriteBatch::new(),
        }
    }

    /// Session handle
    pub fn id(&self) -> BatchId {
        self.id
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        if self.pending.is_empty() {
            SessionState::Empty
        } else {
            SessionState::Pending
        }
    }

    /// Number of queued operations
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Check if nothing is queued
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Queue a put
    pub fn put(&mut self, key: Key, value: Value) {
        self.pending.put(key, value);
    }

    /// Queue a delete
    pub fn delete(&mut self, key: Key) {
        self.pending.delete(key);
    }

    /// Take the queued operations, leaving the session `Empty`
    pub fn take(&mut self) -> WriteBatch {
        std::mem::take(&mut self.pending)
    }
}

#[derive(Debug)]
struct SlotInner {
    active: Option<BatchSession>,
    next_id: u64,
}

/// Holder of the module's single active session
#[derive(Debug)]
pub struct SessionSlot {
    inner: Mutex<SlotInner>,
}

impl SessionSlot {
    /// Create a slot with no session
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(SlotInner {
                active: None,
                next_id: 1,
            }),
        }
    }

    /// Install a fresh `Empty` session, discarding the current one
    pub fn reset(&self) -> BatchId {
        let mut inner = self.inner.lock();
        let id = BatchId::new(inner.next_id);
        inner.next_id += 1;

        if let Some(previous) = inner.active.replace(BatchSession::new(id)) {
            if !previous.is_empty() {
                debug!(
                    discarded = %previous.id(),
                    ops = previous.len(),
                    "dropped uncommitted batch"
                );
            }
        }
        id
    }

    /// Remove the session entirely (module shutdown)
    pub fn clear(&self) {
        self.inner.lock().active = None;
    }

    /// Handle of the active session, if any
    pub fn active_id(&self) -> Option<BatchId> {
        self.inner.lock().active.as_ref().map(BatchSession::id)
    }

    /// State of the active session, if any
    pub fn state(&self) -> Option<SessionState> {
        self.inner.lock().active.as_ref().map(BatchSession::state)
    }

    /// Queue a put into the targeted session
    pub fn put(&self, batch: Option<BatchId>, key: Key, value: Value) -> Result<()> {
        let mut inner = self.inner.lock();
        resolve(&mut inner, batch)?.put(key, value);
        Ok(())
    }

    /// Queue a delete into the targeted session
    pub fn delete(&self, batch: Option<BatchId>, key: Key) -> Result<()> {
        let mut inner = self.inner.lock();
        resolve(&mut inner, batch)?.delete(key);
        Ok(())
    }

    /// Apply the targeted session to `engine` as one atomic write
    ///
    /// The session is `Empty` afterwards whether or not the engine accepted
    /// the batch. Returns the number of operations applied.
    pub fn commit(&self, batch: Option<BatchId>, engine: &dyn Engine) -> Result<usize> {
        let mut inner = self.inner.lock();
        let session = resolve(&mut inner, batch)?;
        let id = session.id();
        let pending = session.take();

        if pending.is_empty() {
            return Ok(0);
        }

        let ops = pending.len();
        match engine.write(pending) {
            Ok(()) => {
                debug!(batch = %id, ops, "batch committed");
                Ok(ops)
            }
            Err(e) => {
                warn!(batch = %id, ops, error = %e, "batch aborted by engine");
                Err(Error::from(e))
            }
        }
    }
}

impl Default for SessionSlot {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve(inner: &mut SlotInner, batch: Option<BatchId>) -> Result<&mut BatchSession> {
    let session = inner
        .active
        .as_mut()
        .ok_or_else(|| Error::invalid_argument("no active batch session"))?;

    match batch {
        Some(id) if id != session.id() => Err(Error::invalid_argument(format!(
            "{} is no longer active (active session is {})",
            id,
            session.id()
        ))),
        _ => Ok(session),
    }
}
