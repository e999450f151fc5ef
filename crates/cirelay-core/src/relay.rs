//! Per-request relay pipeline.
//!
//! `normalize -> aggregate + summarize -> resolve -> notify`, strictly in
//! sequence. The pipeline keeps no state between requests; the only shared
//! resource is the chat directory behind an `Arc`.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::Instrument;
use uuid::Uuid;

use crate::chat::ChatDirectory;
use crate::destination::{self, Destination};
use crate::error::{RelayError, Result};
use crate::notifier::{self, Notification};
use crate::obs;
use crate::outcome::RunOutcome;
use crate::payload::parse_payload;
use crate::summary::{summarize, SanitizedLog};

/// What a successful request did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayReport {
    pub request_id: Uuid,
    pub received_at: DateTime<Utc>,
    pub repository: String,
    pub destination: Destination,

    /// Icon source for the status line (reported job statuses).
    pub overall_success: bool,

    /// Whether the log text itself looked like a failure.
    pub log_failure_detected: bool,

    pub messages_sent: usize,
}

/// JSON body returned to the webhook caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelayResponse {
    Ok { ok: bool },
    Error { error: String },
}

impl RelayResponse {
    pub fn from_result(result: &Result<RelayReport>) -> Self {
        match result {
            Ok(_) => RelayResponse::Ok { ok: true },
            Err(err) => RelayResponse::Error {
                error: err.to_string(),
            },
        }
    }
}

/// Relays CI completion webhooks into chat.
pub struct Relay<D: ?Sized> {
    directory: Arc<D>,
}

impl<D: ?Sized> Clone for Relay<D> {
    fn clone(&self) -> Self {
        Relay {
            directory: Arc::clone(&self.directory),
        }
    }
}

impl<D> Relay<D>
where
    D: ChatDirectory + ?Sized,
{
    pub fn new(directory: Arc<D>) -> Self {
        Relay { directory }
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    /// Handle one webhook body end to end.
    pub async fn handle(&self, body: &[u8]) -> Result<RelayReport> {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("cirelay.relay", request_id = %request_id);
        let start = Instant::now();

        let result = self.process(request_id, body).instrument(span.clone()).await;

        let duration_ms = start.elapsed().as_millis() as u64;
        let _entered = span.enter();
        match &result {
            Ok(report) => obs::emit_relay_finished(&report.repository, true, duration_ms),
            Err(err) => obs::emit_relay_failed(err, duration_ms),
        }
        result
    }

    async fn process(&self, request_id: Uuid, body: &[u8]) -> Result<RelayReport> {
        let received_at = Utc::now();
        obs::emit_payload_received(body.len());

        let event = parse_payload(body).into_result()?;
        let repo = event.repo_short_name().to_string();
        obs::emit_event_normalized(
            &repo,
            event.run_id.as_deref(),
            event.pull_request_number.as_deref(),
        );

        // The two icons come from different signals and are not reconciled.
        let outcome = RunOutcome::aggregate(&event.job_statuses);
        let log_failure_detected =
            SanitizedLog::from_raw(event.raw_log.as_deref()).indicates_failure();
        obs::emit_outcome_computed(
            &repo,
            outcome.overall_success,
            &outcome.job_lines(),
            log_failure_detected,
        );
        let summary = summarize(
            &repo,
            event.pr_label(),
            event.raw_log.as_deref(),
            event.backend_reported_success(),
        );

        let destination = destination::resolve(&*self.directory, &repo).await?;

        let notification = Notification::compose(&event, &outcome, summary);
        let messages_sent =
            notifier::deliver(&*self.directory, &destination, &notification).await?;

        Ok(RelayReport {
            request_id,
            received_at,
            repository: repo,
            destination,
            overall_success: outcome.overall_success,
            log_failure_detected,
            messages_sent,
        })
    }
}

impl From<RelayError> for RelayResponse {
    fn from(err: RelayError) -> Self {
        RelayResponse::Error {
            error: err.to_string(),
        }
    }
}
