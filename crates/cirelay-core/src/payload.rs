//! Webhook payload normalization.
//!
//! Turns the raw request body into an [`InboundEvent`]. Decoding happens in
//! two explicit steps: a structured JSON decode of the bytes as received, then
//! a lossy UTF-8 decode of the same bytes followed by a second JSON decode.
//! Only when both fail is the payload rejected.
//!
//! Field extraction is deliberately forgiving: only the fields the relay uses
//! are read, and each one has a documented fallback.

use serde_json::{Map, Value};

use crate::event::{InboundEvent, KNOWN_JOBS};
use crate::obs;

/// Number of body bytes echoed into the log when a payload is rejected.
const REJECTED_PREVIEW_BYTES: usize = 200;

/// Result of decoding a webhook body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadOutcome {
    /// The body decoded to a JSON object and an event was extracted.
    Parsed(InboundEvent),

    /// Neither decode attempt produced a JSON object.
    MalformedPayload,
}

impl PayloadOutcome {
    /// Convert into a `Result`, mapping a malformed body to `RelayError::MalformedPayload`.
    pub fn into_result(self) -> crate::Result<InboundEvent> {
        match self {
            PayloadOutcome::Parsed(event) => Ok(event),
            PayloadOutcome::MalformedPayload => Err(crate::RelayError::MalformedPayload),
        }
    }
}

/// Decode `body` into an event.
pub fn parse_payload(body: &[u8]) -> PayloadOutcome {
    let value = match serde_json::from_slice::<Value>(body) {
        Ok(value) => value,
        Err(err) => {
            obs::emit_payload_fallback(body.len(), &err);
            match decode_lossy(body) {
                Some(value) => value,
                None => {
                    obs::emit_payload_rejected(&preview(body));
                    return PayloadOutcome::MalformedPayload;
                }
            }
        }
    };

    match value {
        Value::Object(map) => PayloadOutcome::Parsed(extract_event(&map)),
        other => {
            obs::emit_payload_rejected(&format!("non-object JSON: {}", json_kind(&other)));
            PayloadOutcome::MalformedPayload
        }
    }
}

/// Second attempt: repair the encoding, then decode again.
fn decode_lossy(body: &[u8]) -> Option<Value> {
    let text = String::from_utf8_lossy(body);
    let text = text.trim_start_matches('\u{feff}');
    serde_json::from_str(text).ok()
}

/// Pull the relay's fields out of a decoded object.
pub fn extract_event(map: &Map<String, Value>) -> InboundEvent {
    let repository_full_name = map
        .get("repository")
        .and_then(Value::as_object)
        .and_then(|repository| text_field(repository, "full_name"))
        .or_else(|| text_field(map, "repo"));

    let job_statuses = KNOWN_JOBS
        .iter()
        .filter_map(|job| text_field(map, job).map(|status| (job.to_string(), status)))
        .collect();

    InboundEvent {
        repository_full_name,
        run_id: text_field(map, "run_id"),
        pull_request_number: text_field(map, "pr"),
        job_statuses,
        raw_log: map
            .get("backend_log")
            .and_then(Value::as_str)
            .filter(|log| !log.is_empty())
            .map(str::to_string),
    }
}

/// Read a scalar field as text.
///
/// Strings and numbers are accepted; empty strings, zero, `false`, `null`,
/// and nested values count as absent.
fn text_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn preview(body: &[u8]) -> String {
    let end = body.len().min(REJECTED_PREVIEW_BYTES);
    String::from_utf8_lossy(&body[..end]).into_owned()
}
