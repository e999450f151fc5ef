//! Chat platform directory abstraction.
//!
//! The relay never owns a chat connection. It talks to whatever implements
//! [`ChatDirectory`]: the live Discord REST client in production, or
//! [`crate::fakes::MemoryChatDirectory`] in tests. Lookups are answered from
//! the platform at call time; implementations must not cache across requests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A channel category (organizational grouping) inside the guild.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: String,
    pub name: String,
}

/// A text channel that messages can be posted to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelRef {
    pub id: String,
    pub name: String,
}

/// Errors raised by a chat directory implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// The configured guild does not exist or the bot is not a member.
    #[error("Guild not found")]
    GuildNotFound,

    /// Network-level failure talking to the platform.
    #[error("Chat transport error: {0}")]
    Transport(String),

    /// The platform answered with a non-success status.
    #[error("Chat API returned {status}: {body}")]
    Api { status: u16, body: String },
}

/// Result type for chat directory operations
pub type ChatResult<T> = std::result::Result<T, ChatError>;

/// Live view of the guild's channel tree plus the ability to post.
#[async_trait]
pub trait ChatDirectory: Send + Sync {
    /// Find the category whose name equals `name` exactly.
    async fn find_category(&self, name: &str) -> ChatResult<Option<CategoryRef>>;

    /// Find the text channel named `name` inside `category`.
    async fn find_text_channel(
        &self,
        category: &CategoryRef,
        name: &str,
    ) -> ChatResult<Option<ChannelRef>>;

    /// Post `content` to `channel`.
    async fn send(&self, channel: &ChannelRef, content: &str) -> ChatResult<()>;
}
