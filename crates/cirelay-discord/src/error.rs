//! Error types for cirelay-discord

use thiserror::Error;

/// Errors raised while configuring or talking to the Discord API
#[derive(Error, Debug)]
pub enum DiscordError {
    /// No bot token configured
    #[error("Discord bot token is not configured")]
    MissingToken,

    /// Guild id is missing or not a snowflake
    #[error("Invalid Discord guild id: {0:?}")]
    InvalidGuildId(String),

    /// HTTP client could not be built or a request failed in transit
    #[error("HTTP error: {0}")]
    Http(String),

    /// Discord answered with a non-success status
    #[error("Discord API returned {status}: {body}")]
    Api { status: u16, body: String },

    /// Response body was not the expected JSON
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for DiscordError {
    fn from(err: reqwest::Error) -> Self {
        DiscordError::Http(err.to_string())
    }
}
