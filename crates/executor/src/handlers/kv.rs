//! Single-key command handlers.

use stash_core::Value;
use stash_storage::Engine;

use crate::convert::convert_result;
use crate::{Output, Result};

/// Read normalization for `Get`: an absent key reads as the empty value.
///
/// `Get` alone cannot tell a missing key from a stored empty value; `Has`
/// makes the distinction.
pub fn absent_as_empty(value: Option<Value>) -> Value {
    value.unwrap_or_default()
}

/// Handle Put command.
pub fn put(engine: &dyn Engine, key: &[u8], value: &[u8]) -> Result<Output> {
    convert_result(engine.put(key, value))?;
    Ok(Output::Unit)
}

/// Handle Get command.
pub fn get(engine: &dyn Engine, key: &[u8]) -> Result<Output> {
    let value = convert_result(engine.get(key))?;
    Ok(Output::Value(absent_as_empty(value)))
}

/// Handle Has command.
pub fn has(engine: &dyn Engine, key: &[u8]) -> Result<Output> {
    Ok(Output::Bool(convert_result(engine.has(key))?))
}

/// Handle Delete command.
pub fn delete(engine: &dyn Engine, key: &[u8]) -> Result<Output> {
    convert_result(engine.delete(key))?;
    Ok(Output::Unit)
}
