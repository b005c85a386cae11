//! Lifecycle controller
//!
//! [`StorageModule`] owns the engine, the batch session, and the open
//! cursors. It is composed explicitly by the host:
//!
//! ```text
//! let module = StorageModule::new();
//! module.init(&StorageConfig::new("/var/lib/stash"))?;
//! // ... serve commands through an Executor ...
//! module.close();
//! ```
//!
//! Commands reach the engine only while the module is [`ModuleStatus::Active`].
//! Each call clones the engine handle, so `close` never cancels a call that
//! is already running; the call either finishes or observes the closed engine.

use std::sync::Arc;

use parking_lot::RwLock;
use stash_core::{IteratorId, StorageConfig};
use stash_storage::{Engine, RedbEngine};
use tracing::{info, warn};

use crate::iterators::IteratorRegistry;
use crate::session::SessionSlot;
use crate::{Error, Result};

/// Where a module is in its lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleStatus {
    /// Constructed, `init` not yet called
    Inactive,
    /// Engine open, serving commands
    Active,
    /// `init` failed; the reason is kept for later lifecycle errors
    Failed(String),
    /// Engine released by `close`
    Closed,
}

enum State {
    Inactive,
    Active(Arc<dyn Engine>),
    Failed(String),
    Closed,
}

impl State {
    fn status(&self) -> ModuleStatus {
        match self {
            State::Inactive => ModuleStatus::Inactive,
            State::Active(_) => ModuleStatus::Active,
            State::Failed(reason) => ModuleStatus::Failed(reason.clone()),
            State::Closed => ModuleStatus::Closed,
        }
    }
}

/// The storage module: engine plus per-module command state
pub struct StorageModule {
    state: RwLock<State>,
    sessions: SessionSlot,
    iterators: IteratorRegistry,
}

impl StorageModule {
    /// Create an inactive module
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State::Inactive),
            sessions: SessionSlot::new(),
            iterators: IteratorRegistry::new(),
        }
    }

    /// Open the persistent engine described by `config`
    ///
    /// On failure the module becomes [`ModuleStatus::Failed`] and every
    /// command except `Close` is refused.
    pub fn init(&self, config: &StorageConfig) -> Result<()> {
        let mut state = self.state.write();
        ensure_not_active(&state)?;

        let opened = config
            .validate()
            .map_err(|e| e.to_string())
            .and_then(|()| RedbEngine::open(&config.db_path).map_err(|e| e.to_string()));

        match opened {
            Ok(engine) => {
                self.activate(&mut state, Arc::new(engine));
                Ok(())
            }
            Err(reason) => {
                warn!(path = %config.db_path.display(), error = %reason, "storage init failed");
                *state = State::Failed(reason.clone());
                Err(Error::lifecycle(format!("engine failed to open: {}", reason)))
            }
        }
    }

    /// Activate the module over an already constructed engine
    pub fn init_with_engine(&self, engine: Arc<dyn Engine>) -> Result<()> {
        let mut state = self.state.write();
        ensure_not_active(&state)?;
        self.activate(&mut state, engine);
        Ok(())
    }

    fn activate(&self, state: &mut State, engine: Arc<dyn Engine>) {
        self.iterators.release_all();
        let batch = self.sessions.reset();
        *state = State::Active(engine);
        info!(batch = %batch, "storage module active");
    }

    /// Release the engine
    ///
    /// Open cursors are released and the batch session is dropped. Closing a
    /// module that never opened an engine, or closing twice, does nothing.
    pub fn close(&self) -> Result<()> {
        let (engine, released) = {
            let mut state = self.state.write();
            let engine = match std::mem::replace(&mut *state, State::Closed) {
                State::Active(engine) => engine,
                State::Failed(reason) => {
                    *state = State::Failed(reason);
                    return Ok(());
                }
                State::Inactive => {
                    *state = State::Inactive;
                    return Ok(());
                }
                State::Closed => return Ok(()),
            };
            // Drained under the write lock so no cursor can register late
            let released = self.iterators.release_all();
            self.sessions.clear();
            (engine, released)
        };

        engine.close()?;
        info!(released_iterators = released, "storage module closed");
        Ok(())
    }

    /// Current lifecycle status
    pub fn status(&self) -> ModuleStatus {
        self.state.read().status()
    }

    /// Check if commands can be served
    pub fn is_active(&self) -> bool {
        matches!(*self.state.read(), State::Active(_))
    }

    /// Handle to the open engine
    pub(crate) fn engine(&self) -> Result<Arc<dyn Engine>> {
        match &*self.state.read() {
            State::Active(engine) => Ok(Arc::clone(engine)),
            other => Err(not_active(other)),
        }
    }

    /// Open a prefix cursor and register it
    ///
    /// The state lock is held from the scan through registration, so `close`
    /// either sees the cursor and releases it or runs first and the scan is
    /// refused.
    pub(crate) fn open_iterator(&self, prefix: &[u8]) -> Result<IteratorId> {
        let state = self.state.read();
        let engine = match &*state {
            State::Active(engine) => engine,
            other => return Err(not_active(other)),
        };
        let scan = engine.scan_prefix(prefix)?;
        Ok(self.iterators.register(scan))
    }

    pub(crate) fn sessions(&self) -> &SessionSlot {
        &self.sessions
    }

    pub(crate) fn iterators(&self) -> &IteratorRegistry {
        &self.iterators
    }
}

impl Default for StorageModule {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StorageModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageModule")
            .field("status", &self.status())
            .field("iterators", &self.iterators)
            .finish()
    }
}

impl Drop for StorageModule {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!(error = %e, "storage module close on drop failed");
        }
    }
}

fn not_active(state: &State) -> Error {
    match state {
        State::Inactive => Error::lifecycle("module is not initialized"),
        State::Failed(reason) => {
            Error::lifecycle(format!("module failed to initialize: {}", reason))
        }
        State::Closed | State::Active(_) => Error::lifecycle("module is closed"),
    }
}

fn ensure_not_active(state: &State) -> Result<()> {
    match state {
        State::Active(_) => Err(Error::lifecycle("module is already initialized")),
        _ => Ok(()),
    }
}
