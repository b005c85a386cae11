//! JSON envelope for untyped transports
//!
//! A request names a command and lists its positional parameters:
//!
//! ```text
//! {"command": "Put", "params": ["user:1", {"$bytes": "AAEC"}]}
//! {"command": "BatchCommit", "params": [3]}
//! ```
//!
//! Parameters decode as follows:
//! - JSON string: its UTF-8 bytes
//! - `{"$bytes": "<base64>"}`: the decoded bytes
//! - unsigned integer: a batch or iterator handle
//!
//! Anything else is an invalid argument. Responses are either
//! `{"ok": <output>}` or `{"error": {"code": .., "message": ..}}`, where
//! outputs encode as:
//!
//! | Output | JSON |
//! |--------|------|
//! | Unit | `null` |
//! | Bool | `true` / `false` |
//! | Value | `{"$bytes": "<base64>"}` |
//! | Batch | `{"batch": n}` |
//! | Iterator | `{"iterator": n}` |
//! | Entry | `[{"$bytes": ..}, {"$bytes": ..}]` or `null` when exhausted |

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Deserialize;
use serde_json::{json, Map, Value as JsonValue};

use crate::command::{Command, Param};
use crate::{Error, Output, Result};

const BYTES_TAG: &str = "$bytes";

/// A decoded request envelope
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Invocation {
    /// Command name
    pub command: String,
    /// Positional parameters, still in JSON form
    #[serde(default)]
    pub params: Vec<JsonValue>,
}

/// Parse a request envelope into a validated [`Command`]
pub fn decode_invocation(request: &str) -> Result<Command> {
    let invocation: Invocation = serde_json::from_str(request)
        .map_err(|e| Error::invalid_argument(format!("malformed request: {}", e)))?;

    let params = invocation
        .params
        .iter()
        .enumerate()
        .map(|(index, value)| decode_param(index, value))
        .collect::<Result<Vec<_>>>()?;

    Command::from_positional(&invocation.command, params)
}

/// Decode one positional parameter
pub fn decode_param(index: usize, value: &JsonValue) -> Result<Param> {
    match value {
        JsonValue::String(s) => Ok(Param::Bytes(s.as_bytes().to_vec())),
        JsonValue::Number(n) => n.as_u64().map(Param::Handle).ok_or_else(|| {
            Error::invalid_argument(format!(
                "parameter {} must be an unsigned handle, got {}",
                index, n
            ))
        }),
        JsonValue::Object(map) => decode_bytes_wrapper(index, map).map(Param::Bytes),
        other => Err(Error::invalid_argument(format!(
            "parameter {} has unsupported JSON type: {}",
            index, other
        ))),
    }
}

fn decode_bytes_wrapper(index: usize, map: &Map<String, JsonValue>) -> Result<Vec<u8>> {
    let encoded = match (map.len(), map.get(BYTES_TAG)) {
        (1, Some(JsonValue::String(encoded))) => encoded,
        _ => {
            return Err(Error::invalid_argument(format!(
                "parameter {} must be a string, a handle, or {{\"$bytes\": \"<base64>\"}}",
                index
            )))
        }
    };
    STANDARD.decode(encoded).map_err(|e| {
        Error::invalid_argument(format!("parameter {} has invalid base64: {}", index, e))
    })
}

/// Encode bytes as a `$bytes` wrapper
pub fn encode_bytes(bytes: &[u8]) -> JsonValue {
    json!({ BYTES_TAG: STANDARD.encode(bytes) })
}

/// Encode a successful output
pub fn encode_output(output: &Output) -> JsonValue {
    match output {
        Output::Unit => JsonValue::Null,
        Output::Bool(b) => JsonValue::Bool(*b),
        Output::Value(v) => encode_bytes(v),
        Output::Batch(id) => json!({ "batch": id.as_u64() }),
        Output::Iterator(id) => json!({ "iterator": id.as_u64() }),
        Output::Entry(Some((key, value))) => {
            JsonValue::Array(vec![encode_bytes(key), encode_bytes(value)])
        }
        Output::Entry(None) => JsonValue::Null,
    }
}

/// Encode an error as `{"code", "message"}`
pub fn encode_error(error: &Error) -> JsonValue {
    json!({
        "code": error.code(),
        "message": error.to_string(),
    })
}

/// Encode the result of an invocation as a response envelope
pub fn encode_response(result: &Result<Output>) -> JsonValue {
    match result {
        Ok(output) => json!({ "ok": encode_output(output) }),
        Err(error) => json!({ "error": encode_error(error) }),
    }
}
