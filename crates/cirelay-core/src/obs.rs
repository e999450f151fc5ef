//! Structured observability hooks for the relay pipeline.
//!
//! Every function emits one tracing event with a stable `event` field so
//! log pipelines can filter on it. Level follows `CIRELAY_LOG` or
//! `RUST_LOG`; JSON output is selected by the daemon's `--json` flag.

use std::fmt::Display;

use tracing::{info, warn};

use crate::error::DestinationKind;

/// Emit event: webhook body received.
pub fn emit_payload_received(body_len: usize) {
    info!(event = "payload.received", body_len = body_len);
}

/// Emit event: structured decode failed, retrying through UTF-8.
pub fn emit_payload_fallback(body_len: usize, error: &dyn Display) {
    warn!(event = "payload.fallback", body_len = body_len, error = %error);
}

/// Emit event: body rejected as malformed.
pub fn emit_payload_rejected(preview: &str) {
    warn!(event = "payload.rejected", preview = %preview);
}

/// Emit event: payload normalized into an event.
pub fn emit_event_normalized(repo: &str, run_id: Option<&str>, pr: Option<&str>) {
    info!(
        event = "event.normalized",
        repo = %repo,
        run_id = run_id.unwrap_or_default(),
        pr = pr.unwrap_or_default(),
    );
}

/// Emit event: job statuses and log text evaluated.
pub fn emit_outcome_computed(
    repo: &str,
    overall_success: bool,
    job_lines: &[String],
    log_failure: bool,
) {
    info!(
        event = "outcome.computed",
        repo = %repo,
        overall_success = overall_success,
        jobs = %job_lines.join(", "),
        log_failure = log_failure,
    );
}

/// Emit event: no category or channel for the repository.
pub fn emit_destination_missing(kind: DestinationKind, name: &str) {
    warn!(event = "destination.missing", kind = kind.as_str(), name = %name);
}

/// Emit event: one notification message posted.
pub fn emit_message_sent(channel: &str, seq: usize) {
    info!(event = "message.sent", channel = %channel, seq = seq);
}

/// Emit event: request handled, with outcome and elapsed time.
pub fn emit_relay_finished(repo: &str, ok: bool, duration_ms: u64) {
    info!(event = "relay.finished", repo = %repo, ok = ok, duration_ms = duration_ms);
}

/// Emit event: request ended with an error.
pub fn emit_relay_failed(error: &dyn Display, duration_ms: u64) {
    warn!(event = "relay.failed", error = %error, duration_ms = duration_ms);
}
