//! Supply channels and the references drafts use to point at them.

use crate::ChannelId;
use serde::{Deserialize, Serialize};

/// Role a channel plays in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChannelRole {
    /// Channel holds stock (the role given to channels created during sync).
    InventorySupply,
    ProductDistribution,
    OrderExport,
    OrderImport,
    Primary,
}

/// A supply channel as stored remotely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: ChannelId,
    #[serde(default)]
    pub version: u64,
    /// Human-readable unique key. Drafts reference channels by this.
    pub key: String,
    #[serde(default)]
    pub roles: Vec<ChannelRole>,
}

impl Channel {
    /// Creates a freshly stored inventory-supply channel.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            id: ChannelId::new(),
            version: 1,
            key: key.into(),
            roles: vec![ChannelRole::InventorySupply],
        }
    }
}

/// How a draft refers to its supply channel.
///
/// Drafts never carry store ids: they either hold a bare key placeholder or
/// an expanded channel object. Either way the channel key is what identifies
/// the channel until the engine resolves it against the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChannelReference {
    /// Full channel object; its own `key` is used.
    Expanded(Channel),
    /// Unresolved placeholder holding only the channel key.
    Key(String),
}

impl ChannelReference {
    /// Builds a key-only reference.
    pub fn of_key(key: impl Into<String>) -> Self {
        Self::Key(key.into())
    }

    /// Returns the channel key this reference points at.
    pub fn key(&self) -> &str {
        match self {
            Self::Expanded(channel) => &channel.key,
            Self::Key(key) => key,
        }
    }
}

impl From<Channel> for ChannelReference {
    fn from(channel: Channel) -> Self {
        Self::Expanded(channel)
    }
}

impl From<String> for ChannelReference {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<&str> for ChannelReference {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}
