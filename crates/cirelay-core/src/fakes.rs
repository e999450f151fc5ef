//! In-memory fake for the chat directory (testing only)
//!
//! `MemoryChatDirectory` holds a fixed category/channel tree and records
//! every message sent, so pipeline tests can assert on exact output.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::chat::{CategoryRef, ChannelRef, ChatDirectory, ChatError, ChatResult};

/// A message captured by [`MemoryChatDirectory::send`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub channel: ChannelRef,
    pub content: String,
}

#[derive(Debug)]
struct CategoryEntry {
    category: CategoryRef,
    text_channels: Vec<ChannelRef>,
}

/// In-memory guild backed by a list of categories.
#[derive(Debug, Default)]
pub struct MemoryChatDirectory {
    categories: Vec<CategoryEntry>,
    guild_missing: bool,
    fail_sends_after: Option<usize>,
    next_id: u64,
    sent: Mutex<Vec<SentMessage>>,
}

impl MemoryChatDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an empty category.
    pub fn with_category(mut self, name: &str) -> Self {
        let id = self.allocate_id();
        self.categories.push(CategoryEntry {
            category: CategoryRef {
                id,
                name: name.to_string(),
            },
            text_channels: Vec::new(),
        });
        self
    }

    /// Add a text channel to the first category named `category`, creating
    /// the category if needed.
    pub fn with_text_channel(mut self, category: &str, channel: &str) -> Self {
        if !self.categories.iter().any(|e| e.category.name == category) {
            self = self.with_category(category);
        }
        let id = self.allocate_id();
        if let Some(entry) = self
            .categories
            .iter_mut()
            .find(|e| e.category.name == category)
        {
            entry.text_channels.push(ChannelRef {
                id,
                name: channel.to_string(),
            });
        }
        self
    }

    /// Make every lookup fail with `ChatError::GuildNotFound`.
    pub fn without_guild(mut self) -> Self {
        self.guild_missing = true;
        self
    }

    /// Let the first `n` sends succeed and fail every later one.
    pub fn failing_sends_after(mut self, n: usize) -> Self {
        self.fail_sends_after = Some(n);
        self
    }

    /// Messages sent so far, in order.
    pub fn sent_messages(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    fn allocate_id(&mut self) -> String {
        self.next_id += 1;
        format!("{}", 1_000 + self.next_id)
    }

    fn check_guild(&self) -> ChatResult<()> {
        if self.guild_missing {
            return Err(ChatError::GuildNotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl ChatDirectory for MemoryChatDirectory {
    async fn find_category(&self, name: &str) -> ChatResult<Option<CategoryRef>> {
        self.check_guild()?;
        Ok(self
            .categories
            .iter()
            .find(|e| e.category.name == name)
            .map(|e| e.category.clone()))
    }

    async fn find_text_channel(
        &self,
        category: &CategoryRef,
        name: &str,
    ) -> ChatResult<Option<ChannelRef>> {
        self.check_guild()?;
        Ok(self
            .categories
            .iter()
            .find(|e| e.category.id == category.id)
            .and_then(|e| e.text_channels.iter().find(|c| c.name == name))
            .cloned())
    }

    async fn send(&self, channel: &ChannelRef, content: &str) -> ChatResult<()> {
        let mut sent = self.sent.lock().unwrap();
        if let Some(limit) = self.fail_sends_after {
            if sent.len() >= limit {
                return Err(ChatError::Api {
                    status: 500,
                    body: "send rejected".to_string(),
                });
            }
        }
        sent.push(SentMessage {
            channel: channel.clone(),
            content: content.to_string(),
        });
        Ok(())
    }
}
