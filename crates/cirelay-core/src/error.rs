//! Error types for relay operations

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chat::ChatError;

/// Which level of the channel hierarchy could not be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DestinationKind {
    Category,
    Channel,
}

impl DestinationKind {
    /// Lowercase label used in structured log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            DestinationKind::Category => "category",
            DestinationKind::Channel => "channel",
        }
    }
}

impl fmt::Display for DestinationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DestinationKind::Category => write!(f, "Category"),
            DestinationKind::Channel => write!(f, "Channel"),
        }
    }
}

/// Terminal outcomes of a single relay request.
///
/// Every variant ends processing of the event it was raised for; nothing is
/// retried. The `Display` text is what the webhook caller sees.
#[derive(Error, Debug)]
pub enum RelayError {
    /// Body could not be decoded as a JSON object, even after the UTF-8 fallback.
    #[error("Invalid JSON payload")]
    MalformedPayload,

    /// The configured guild is not visible to the bot.
    #[error("Guild not found")]
    GuildNotFound,

    /// No category named after the repository, or no report channel inside it.
    #[error("{kind} {name} not found")]
    DestinationNotFound { kind: DestinationKind, name: String },

    /// The chat directory could not be queried.
    #[error("Chat directory lookup failed: {0}")]
    Directory(#[source] ChatError),

    /// Sending a notification message failed.
    #[error("Failed to deliver notification: {0}")]
    DeliverySendFailure(#[source] ChatError),
}

impl RelayError {
    /// Whether the request itself was at fault (as opposed to the chat side).
    pub fn is_client_error(&self) -> bool {
        matches!(self, RelayError::MalformedPayload)
    }

    /// Whether the failure is a missing guild, category or channel.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RelayError::GuildNotFound | RelayError::DestinationNotFound { .. }
        )
    }
}

/// Result type for relay operations
pub type Result<T> = std::result::Result<T, RelayError>;
