//! Prefix iteration.

use stash_core::{IteratorId, KvPair};
use tracing::debug;

use super::Stash;
use crate::{Command, Error, Output, Result};

impl Stash {
    /// Open a cursor over every pair whose key starts with `prefix`.
    ///
    /// The cursor is released when the returned iterator is dropped.
    pub fn scan_prefix(&self, prefix: impl AsRef<[u8]>) -> Result<PrefixIter<'_>> {
        match self.run(Command::NewIterator {
            prefix: prefix.as_ref().to_vec(),
        })? {
            Output::Iterator(id) => Ok(PrefixIter {
                db: self,
                id,
                done: false,
            }),
            _ => Err(Error::Internal {
                reason: "Unexpected output for NewIterator".into(),
            }),
        }
    }
}

/// Iterator over the pairs under a prefix, in ascending key order
///
/// Yields `Err` once if the engine fails mid-scan, then ends.
#[derive(Debug)]
pub struct PrefixIter<'a> {
    db: &'a Stash,
    id: IteratorId,
    done: bool,
}

impl PrefixIter<'_> {
    /// Handle of the underlying cursor
    pub fn id(&self) -> IteratorId {
        self.id
    }
}

impl Iterator for PrefixIter<'_> {
    type Item = Result<KvPair>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = match self.db.run(Command::IteratorNext { iterator: self.id }) {
            Ok(Output::Entry(entry)) => entry.map(Ok),
            Ok(_) => Some(Err(Error::Internal {
                reason: "Unexpected output for IteratorNext".into(),
            })),
            Err(e) => Some(Err(e)),
        };
        if !matches!(result, Some(Ok(_))) {
            self.done = true;
        }
        result
    }
}

impl Drop for PrefixIter<'_> {
    fn drop(&mut self) {
        // Already gone if the module closed first
        if let Err(e) = self.db.run(Command::IteratorRelease { iterator: self.id }) {
            debug!(iterator = %self.id, error = %e, "iterator release skipped");
        }
    }
}
