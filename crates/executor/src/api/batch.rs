//! Batch session operations.

use stash_core::BatchId;

use super::Stash;
use crate::{Command, Error, Output, Result};

impl Stash {
    // =========================================================================
    // Batch Operations
    // =========================================================================

    /// Start a fresh batch session.
    ///
    /// Any uncommitted writes of the previous session are discarded and its
    /// id stops being accepted.
    pub fn new_batch(&self) -> Result<BatchId> {
        match self.run(Command::NewBatch)? {
            Output::Batch(id) => Ok(id),
            _ => Err(Error::Internal {
                reason: "Unexpected output for NewBatch".into(),
            }),
        }
    }

    /// Queue a put into the session `batch`.
    pub fn batch_put(
        &self,
        batch: BatchId,
        key: impl AsRef<[u8]>,
        value: impl AsRef<[u8]>,
    ) -> Result<()> {
        self.expect_unit(
            Command::BatchPut {
                batch: Some(batch),
                key: key.as_ref().to_vec(),
                value: value.as_ref().to_vec(),
            },
            "BatchPut",
        )
    }

    /// Queue a delete into the session `batch`.
    pub fn batch_delete(&self, batch: BatchId, key: impl AsRef<[u8]>) -> Result<()> {
        self.expect_unit(
            Command::BatchDelete {
                batch: Some(batch),
                key: key.as_ref().to_vec(),
            },
            "BatchDelete",
        )
    }

    /// Apply everything queued in `batch` as one atomic write.
    pub fn batch_commit(&self, batch: BatchId) -> Result<()> {
        self.expect_unit(Command::BatchCommit { batch: Some(batch) }, "BatchCommit")
    }

    fn expect_unit(&self, cmd: Command, name: &str) -> Result<()> {
        match self.run(cmd)? {
            Output::Unit => Ok(()),
            _ => Err(Error::Internal {
                reason: format!("Unexpected output for {}", name),
            }),
        }
    }
}
