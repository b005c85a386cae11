//! Storage-to-executor error conversion.

use crate::Result;

/// Convert a storage result into an executor result
///
/// Every storage failure surfaces as [`Error::EngineFailure`](crate::Error::EngineFailure).
pub fn convert_result<T>(result: stash_storage::Result<T>) -> Result<T> {
    result.map_err(crate::Error::from)
}
