//! Prefix iterator command handlers.

use stash_core::IteratorId;

use crate::iterators::IteratorRegistry;
use crate::module::StorageModule;
use crate::{Output, Result};

/// Handle NewIterator command.
pub fn new_iterator(module: &StorageModule, prefix: &[u8]) -> Result<Output> {
    Ok(Output::Iterator(module.open_iterator(prefix)?))
}

/// Handle IteratorNext command.
pub fn iterator_next(iterators: &IteratorRegistry, iterator: IteratorId) -> Result<Output> {
    Ok(Output::Entry(iterators.next(iterator)?))
}

/// Handle IteratorRelease command.
pub fn iterator_release(iterators: &IteratorRegistry, iterator: IteratorId) -> Result<Output> {
    iterators.release(iterator)?;
    Ok(Output::Unit)
}
