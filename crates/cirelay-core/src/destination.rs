//! Destination resolution: repository short name -> report channel.
//!
//! The guild is organized as one category per repository, each holding a
//! `pr-report` text channel. Matching is exact; nothing is created on demand.

use serde::{Deserialize, Serialize};

use crate::chat::{CategoryRef, ChannelRef, ChatDirectory, ChatError};
use crate::error::{DestinationKind, RelayError, Result};
use crate::obs;

/// Name of the text channel that receives run reports.
pub const REPORT_CHANNEL: &str = "pr-report";

/// Where a run's notifications are posted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub category: CategoryRef,
    pub channel: ChannelRef,
}

/// Look up the report channel for `repo_short_name`.
pub async fn resolve<D>(directory: &D, repo_short_name: &str) -> Result<Destination>
where
    D: ChatDirectory + ?Sized,
{
    let category = directory
        .find_category(repo_short_name)
        .await
        .map_err(lookup_error)?
        .ok_or_else(|| not_found(DestinationKind::Category, repo_short_name))?;

    let channel = directory
        .find_text_channel(&category, REPORT_CHANNEL)
        .await
        .map_err(lookup_error)?
        .ok_or_else(|| not_found(DestinationKind::Channel, REPORT_CHANNEL))?;

    Ok(Destination { category, channel })
}

fn lookup_error(err: ChatError) -> RelayError {
    match err {
        ChatError::GuildNotFound => RelayError::GuildNotFound,
        other => RelayError::Directory(other),
    }
}

fn not_found(kind: DestinationKind, name: &str) -> RelayError {
    obs::emit_destination_missing(kind, name);
    RelayError::DestinationNotFound {
        kind,
        name: name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::MemoryChatDirectory;

    #[tokio::test]
    async fn test_resolves_report_channel() {
        let directory = MemoryChatDirectory::new()
            .with_text_channel("widget", "general")
            .with_text_channel("widget", REPORT_CHANNEL);

        let destination = resolve(&directory, "widget").await.unwrap();
        assert_eq!(destination.category.name, "widget");
        assert_eq!(destination.channel.name, REPORT_CHANNEL);
    }

    #[tokio::test]
    async fn test_missing_category() {
        let directory = MemoryChatDirectory::new().with_text_channel("other", REPORT_CHANNEL);

        let err = resolve(&directory, "widget").await.unwrap_err();
        match err {
            RelayError::DestinationNotFound { kind, name } => {
                assert_eq!(kind, DestinationKind::Category);
                assert_eq!(name, "widget");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_missing_channel() {
        let directory = MemoryChatDirectory::new().with_text_channel("widget", "general");

        let err = resolve(&directory, "widget").await.unwrap_err();
        assert_eq!(err.to_string(), "Channel pr-report not found");
    }

    #[tokio::test]
    async fn test_category_match_is_exact() {
        let directory = MemoryChatDirectory::new().with_text_channel("Widget", REPORT_CHANNEL);
        assert!(resolve(&directory, "widget").await.is_err());
    }

    #[tokio::test]
    async fn test_channel_in_other_category_not_used() {
        let directory = MemoryChatDirectory::new()
            .with_category("widget")
            .with_text_channel("gadget", REPORT_CHANNEL);

        let err = resolve(&directory, "widget").await.unwrap_err();
        assert!(matches!(
            err,
            RelayError::DestinationNotFound {
                kind: DestinationKind::Channel,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_missing_guild() {
        let directory = MemoryChatDirectory::new().without_guild();
        let err = resolve(&directory, "widget").await.unwrap_err();
        assert!(matches!(err, RelayError::GuildNotFound));
    }
}
