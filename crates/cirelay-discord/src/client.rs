//! Discord REST client
//!
//! Implements [`ChatDirectory`] against the Discord HTTP API. The guild's
//! channel list is fetched on every lookup so renames and deletions are
//! seen immediately.

use async_trait::async_trait;
use cirelay_core::{CategoryRef, ChannelRef, ChatDirectory, ChatError, ChatResult};
use reqwest::{Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::error::DiscordError;
use crate::Result;

/// Discord API base used when none is configured.
pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";

const CHANNEL_TYPE_GUILD_TEXT: u8 = 0;
const CHANNEL_TYPE_GUILD_CATEGORY: u8 = 4;
const CHANNEL_TYPE_GUILD_ANNOUNCEMENT: u8 = 5;

/// Discord connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordConfig {
    /// API base URL, without trailing slash
    pub api_base: String,
    /// Bot token (sent as `Authorization: Bot <token>`)
    pub token: String,
    /// Guild whose channels receive reports
    pub guild_id: u64,
}

impl DiscordConfig {
    pub fn new(token: &str, guild_id: u64) -> Self {
        DiscordConfig {
            api_base: DEFAULT_API_BASE.to_string(),
            token: token.to_string(),
            guild_id,
        }
    }

    /// Override the API base (used by tests and proxies).
    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }
}

/// Parse a guild snowflake.
pub fn parse_guild_id(raw: &str) -> Result<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| DiscordError::InvalidGuildId(raw.to_string()))
}

/// The bot account behind the configured token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotUser {
    pub id: String,
    pub username: String,
}

/// Channel object as returned by `GET /guilds/{id}/channels`.
#[derive(Debug, Clone, Deserialize)]
struct GuildChannel {
    id: String,
    #[serde(rename = "type")]
    kind: u8,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    parent_id: Option<String>,
}

impl GuildChannel {
    fn is_named(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name)
    }

    fn is_text(&self) -> bool {
        self.kind == CHANNEL_TYPE_GUILD_TEXT || self.kind == CHANNEL_TYPE_GUILD_ANNOUNCEMENT
    }
}

/// Discord client for directory lookups and message posting
pub struct DiscordClient {
    config: DiscordConfig,
    http_client: reqwest::Client,
}

impl DiscordClient {
    /// Create a new Discord client
    pub fn new(config: DiscordConfig) -> Result<Self> {
        if config.token.trim().is_empty() {
            return Err(DiscordError::MissingToken);
        }
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("cirelay/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(DiscordClient {
            config,
            http_client,
        })
    }

    pub fn config(&self) -> &DiscordConfig {
        &self.config
    }

    /// Identify the bot account (`GET /users/@me`).
    pub async fn current_user(&self) -> Result<BotUser> {
        let response = self
            .http_client
            .get(self.url("/users/@me"))
            .header("Authorization", self.auth_header())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DiscordError::Api {
                status: status.as_u16(),
                body,
            });
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base.trim_end_matches('/'), path)
    }

    fn auth_header(&self) -> String {
        format!("Bot {}", self.config.token)
    }

    async fn guild_channels(&self) -> ChatResult<Vec<GuildChannel>> {
        let path = format!("/guilds/{}/channels", self.config.guild_id);
        let response = self
            .http_client
            .get(self.url(&path))
            .header("Authorization", self.auth_header())
            .send()
            .await
            .map_err(transport_error)?;

        match response.status() {
            StatusCode::NOT_FOUND | StatusCode::FORBIDDEN => return Err(ChatError::GuildNotFound),
            status if !status.is_success() => return Err(api_error(response).await),
            _ => {}
        }

        let channels: Vec<GuildChannel> = response.json().await.map_err(|err| {
            ChatError::Transport(format!("invalid guild channel listing: {}", err))
        })?;
        debug!(
            guild_id = self.config.guild_id,
            channels = channels.len(),
            "Fetched guild channels"
        );
        Ok(channels)
    }
}

#[async_trait]
impl ChatDirectory for DiscordClient {
    async fn find_category(&self, name: &str) -> ChatResult<Option<CategoryRef>> {
        let channels = self.guild_channels().await?;
        Ok(channels
            .into_iter()
            .find(|c| c.kind == CHANNEL_TYPE_GUILD_CATEGORY && c.is_named(name))
            .map(|c| CategoryRef {
                id: c.id,
                name: name.to_string(),
            }))
    }

    async fn find_text_channel(
        &self,
        category: &CategoryRef,
        name: &str,
    ) -> ChatResult<Option<ChannelRef>> {
        let channels = self.guild_channels().await?;
        Ok(channels
            .into_iter()
            .find(|c| {
                c.is_text()
                    && c.is_named(name)
                    && c.parent_id.as_deref() == Some(category.id.as_str())
            })
            .map(|c| ChannelRef {
                id: c.id,
                name: name.to_string(),
            }))
    }

    async fn send(&self, channel: &ChannelRef, content: &str) -> ChatResult<()> {
        let path = format!("/channels/{}/messages", channel.id);
        let response = self
            .http_client
            .post(self.url(&path))
            .header("Authorization", self.auth_header())
            .json(&json!({ "content": content }))
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        debug!(channel_id = %channel.id, "Posted message");
        Ok(())
    }
}

fn transport_error(err: reqwest::Error) -> ChatError {
    ChatError::Transport(err.to_string())
}

async fn api_error(response: Response) -> ChatError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    ChatError::Api { status, body }
}
