//! Outbound notification composition and delivery.

use crate::chat::ChatDirectory;
use crate::destination::Destination;
use crate::error::{RelayError, Result};
use crate::event::InboundEvent;
use crate::obs;
use crate::outcome::RunOutcome;

/// The two messages posted for one run, in send order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Overall icon, repository, optional PR line, and log link.
    pub status_line: String,

    /// Detailed log summary.
    pub summary: String,
}

impl Notification {
    /// Build the notification for `event`.
    pub fn compose(event: &InboundEvent, outcome: &RunOutcome, summary: String) -> Self {
        Notification {
            status_line: status_line(
                outcome,
                event.repo_short_name(),
                event.pull_request_number.as_deref(),
                &event.run_url(),
            ),
            summary,
        }
    }

    /// Messages in the order they must be posted.
    pub fn messages(&self) -> [&str; 2] {
        [self.status_line.as_str(), self.summary.as_str()]
    }
}

/// First message: `✅ PR check finished for **repo**`, an optional PR line,
/// then a markdown link to the run.
pub fn status_line(
    outcome: &RunOutcome,
    repo_short_name: &str,
    pr: Option<&str>,
    run_url: &str,
) -> String {
    let pr_suffix = pr.map(|pr| format!("\nPR: #{}", pr)).unwrap_or_default();
    format!(
        "{} PR check finished for **{}**{}\n[Logs]({})",
        outcome.overall_icon(),
        repo_short_name,
        pr_suffix,
        run_url
    )
}

/// Post both messages to the destination channel, sequentially.
///
/// Stops at the first failed send; the summary is never posted without the
/// status line before it. Returns the number of messages sent.
pub async fn deliver<D>(
    directory: &D,
    destination: &Destination,
    notification: &Notification,
) -> Result<usize>
where
    D: ChatDirectory + ?Sized,
{
    let mut sent = 0;
    for message in notification.messages() {
        directory
            .send(&destination.channel, message)
            .await
            .map_err(RelayError::DeliverySendFailure)?;
        sent += 1;
        obs::emit_message_sent(&destination.channel.name, sent);
    }
    Ok(sent)
}
