//! Supply channel registry cache.
//!
//! Built once per sync call from a bulk fetch of all channels, optionally
//! extended with channels created for keys the drafts reference but the
//! store lacks. After bootstrap it is only read.

use invsync_types::{Channel, ChannelId, InventoryEntryDraft};
use std::collections::{HashMap, HashSet};

/// Bidirectional key/id mapping of the store's supply channels.
#[derive(Debug, Clone, Default)]
pub struct ChannelCache {
    ids_by_key: HashMap<String, ChannelId>,
    keys_by_id: HashMap<ChannelId, String>,
}

impl ChannelCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the cache from fetched channels.
    pub fn build(channels: impl IntoIterator<Item = Channel>) -> Self {
        let mut cache = Self::new();
        for channel in channels {
            cache.insert(channel);
        }
        cache
    }

    /// Adds a channel, replacing any previous mapping for its key.
    pub fn insert(&mut self, channel: Channel) {
        if let Some(previous) = self.ids_by_key.insert(channel.key.clone(), channel.id) {
            self.keys_by_id.remove(&previous);
        }
        self.keys_by_id.insert(channel.id, channel.key);
    }

    /// Looks up the store id of a channel key.
    pub fn channel_id(&self, key: &str) -> Option<ChannelId> {
        self.ids_by_key.get(key).copied()
    }

    /// Looks up the key of a channel id.
    pub fn channel_key(&self, id: &ChannelId) -> Option<&str> {
        self.keys_by_id.get(id).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.ids_by_key.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.ids_by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids_by_key.is_empty()
    }

    /// Distinct channel keys referenced by `drafts` that the cache lacks,
    /// in first-seen order.
    pub fn missing_keys<'a>(
        &self,
        drafts: impl IntoIterator<Item = &'a InventoryEntryDraft>,
    ) -> Vec<String> {
        let mut seen = HashSet::new();
        drafts
            .into_iter()
            .filter_map(InventoryEntryDraft::channel_key)
            .filter(|key| !self.contains_key(key))
            .filter(|key| seen.insert(*key))
            .map(str::to_owned)
            .collect()
    }
}
