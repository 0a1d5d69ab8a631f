//! Composite identity used to match drafts against stored entries.

use crate::channels::ChannelCache;
use invsync_types::{InventoryEntry, InventoryEntryDraft, ResolvedDraft};
use std::fmt;

/// (sku, channel key) pair identifying one inventory entry.
///
/// `channel_key == None` is its own match class: drafts without a supply
/// channel only ever match entries without one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SkuChannelKey {
    pub sku: String,
    pub channel_key: Option<String>,
}

impl SkuChannelKey {
    pub fn new(sku: impl Into<String>, channel_key: Option<String>) -> Self {
        Self {
            sku: sku.into(),
            channel_key,
        }
    }

    /// Key of a caller-supplied draft. A missing sku yields an empty one;
    /// such drafts are filtered out before matching.
    pub fn of_draft(draft: &InventoryEntryDraft) -> Self {
        Self::new(
            draft.sku.clone().unwrap_or_default(),
            draft.channel_key().map(str::to_owned),
        )
    }

    pub fn of_resolved(draft: &ResolvedDraft) -> Self {
        Self::new(draft.sku.clone(), draft.channel_key.clone())
    }

    /// Key of a stored entry. Entries pointing at a channel the cache does
    /// not know cannot be keyed and yield `None`.
    pub fn of_entry(entry: &InventoryEntry, channels: &ChannelCache) -> Option<Self> {
        match entry.supply_channel {
            None => Some(Self::new(entry.sku.clone(), None)),
            Some(id) => channels
                .channel_key(&id)
                .map(|key| Self::new(entry.sku.clone(), Some(key.to_owned()))),
        }
    }
}

impl fmt::Display for SkuChannelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.channel_key {
            Some(key) => write!(f, "sku '{}' / channel '{}'", self.sku, key),
            None => write!(f, "sku '{}' / no channel", self.sku),
        }
    }
}
