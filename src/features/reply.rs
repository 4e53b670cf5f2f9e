//! Reply extraction from workflow outputs.

use serde_json::{Map, Value};

use crate::clients::WorkflowOutputs;
use crate::errors::HandlerError;

/// Output variables that may carry the reply, highest priority first.
pub const REPLY_KEYS: [&str; 3] = ["result", "text", "answer"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Found(String),
    NotFound,
}

/// What to do when none of the candidate keys holds a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyPolicy {
    /// Reply with the whole outputs object serialized as JSON.
    SerializeFallback,
    /// Fail with `NoReply`.
    RequireText,
}

/// Returns the first candidate key holding a usable value. Empty strings,
/// `null` and `false` are skipped; other non-string values are stringified.
#[must_use]
pub fn extract_first(outputs: &Map<String, Value>, keys: &[&str]) -> Extraction {
    keys.iter()
        .filter_map(|key| outputs.get(*key))
        .find_map(|value| match value {
            Value::Null | Value::Bool(false) => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        })
        .map_or(Extraction::NotFound, Extraction::Found)
}

/// Normalizes workflow outputs into one reply string.
///
/// # Errors
///
/// `NoReply` when the run produced no outputs object, or when `policy`
/// requires text and none of [`REPLY_KEYS`] holds any.
pub fn extract_reply(outputs: WorkflowOutputs, policy: ReplyPolicy) -> Result<String, HandlerError> {
    let Some(outputs) = outputs.0 else {
        return Err(HandlerError::NoReply {
            raw: Value::Object(Map::new()),
        });
    };

    match (extract_first(&outputs, &REPLY_KEYS), policy) {
        (Extraction::Found(reply), _) => Ok(reply),
        (Extraction::NotFound, ReplyPolicy::SerializeFallback) => {
            Ok(Value::Object(outputs).to_string())
        }
        (Extraction::NotFound, ReplyPolicy::RequireText) => Err(HandlerError::NoReply {
            raw: Value::Object(outputs),
        }),
    }
}
