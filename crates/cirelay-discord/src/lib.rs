//! cirelay-discord: Discord integration for cirelay
//!
//! Provides [`DiscordClient`], the production [`cirelay_core::ChatDirectory`].
//! It resolves categories and channels through the Discord REST API and
//! posts notification messages as the configured bot.

pub mod client;
pub mod error;

pub use client::{parse_guild_id, BotUser, DiscordClient, DiscordConfig, DEFAULT_API_BASE};
pub use error::DiscordError;

/// Result type for Discord operations
pub type Result<T> = std::result::Result<T, DiscordError>;
