//! Single-key operations.

use super::Stash;
use crate::{Command, Error, Output, Result};

impl Stash {
    // =========================================================================
    // KV Operations
    // =========================================================================

    /// Store `value` under `key`, overwriting any previous value.
    pub fn put(&self, key: impl AsRef<[u8]>, value: impl AsRef<[u8]>) -> Result<()> {
        match self.run(Command::Put {
            key: key.as_ref().to_vec(),
            value: value.as_ref().to_vec(),
        })? {
            Output::Unit => Ok(()),
            _ => Err(Error::Internal {
                reason: "Unexpected output for Put".into(),
            }),
        }
    }

    /// Read the value under `key`.
    ///
    /// An absent key reads as an empty value. Use [`Stash::has`] to tell
    /// the two apart.
    pub fn get(&self, key: impl AsRef<[u8]>) -> Result<Vec<u8>> {
        match self.run(Command::Get {
            key: key.as_ref().to_vec(),
        })? {
            Output::Value(v) => Ok(v),
            _ => Err(Error::Internal {
                reason: "Unexpected output for Get".into(),
            }),
        }
    }

    /// Check whether `key` is stored.
    pub fn has(&self, key: impl AsRef<[u8]>) -> Result<bool> {
        match self.run(Command::Has {
            key: key.as_ref().to_vec(),
        })? {
            Output::Bool(b) => Ok(b),
            _ => Err(Error::Internal {
                reason: "Unexpected output for Has".into(),
            }),
        }
    }

    /// Remove `key`. Removing an absent key succeeds.
    pub fn delete(&self, key: impl AsRef<[u8]>) -> Result<()> {
        match self.run(Command::Delete {
            key: key.as_ref().to_vec(),
        })? {
            Output::Unit => Ok(()),
            _ => Err(Error::Internal {
                reason: "Unexpected output for Delete".into(),
            }),
        }
    }
}
