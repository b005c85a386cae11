//! Engine abstraction
//!
//! [`Engine`] is the contract the storage module consumes from the
//! underlying ordered key-value store. Implementations own their internal
//! locking: every method takes `&self` and may be called from many threads.

use stash_core::{KvPair, Value};

use crate::batch::WriteBatch;
use crate::error::Result;

/// Lazy cursor over the pairs sharing a prefix
///
/// Yields pairs in ascending byte-lexicographic key order and ends when no
/// more keys match. Dropping the cursor frees its engine-side resources.
pub trait PrefixScan: Iterator<Item = Result<KvPair>> + Send {}

impl<T> PrefixScan for T where T: Iterator<Item = Result<KvPair>> + Send {}

/// Ordered key-value engine
///
/// # Contract
///
/// - `get` reports a missing key as `Ok(None)`, never as an error
/// - `delete` of a missing key succeeds
/// - `write` applies a whole batch or nothing
/// - `scan_prefix` reads from a snapshot taken when it is called
/// - `close` is idempotent; afterwards every other method fails with
///   [`StorageError::Closed`](crate::StorageError::Closed)
pub trait Engine: Send + Sync {
    /// Store `value` under `key`
    fn put(&self, key: &[u8], value: &[u8]) -> Result<()>;

    /// Read the value stored under `key`
    fn get(&self, key: &[u8]) -> Result<Option<Value>>;

    /// Check whether `key` is stored
    fn has(&self, key: &[u8]) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Remove `key`
    fn delete(&self, key: &[u8]) -> Result<()>;

    /// Apply every operation of `batch` atomically, in order
    fn write(&self, batch: WriteBatch) -> Result<()>;

    /// Open a cursor over all keys starting with `prefix`
    fn scan_prefix(&self, prefix: &[u8]) -> Result<Box<dyn PrefixScan>>;

    /// Release the engine
    fn close(&self) -> Result<()>;
}

/// Smallest key strictly greater than every key starting with `prefix`
///
/// Returns `None` when no such bound exists (empty prefix or all `0xff`).
pub fn prefix_upper_bound(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut upper = prefix.to_vec();
    while let Some(last) = upper.pop() {
        if last < u8::MAX {
            upper.push(last + 1);
            return Some(upper);
        }
    }
    None
}
