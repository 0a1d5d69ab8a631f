//! Inventory drafts and stored inventory entries.
//!
//! A draft is the caller's desired state for one (sku, supply channel)
//! pair. An entry is what the store currently holds for such a pair.

use crate::{ChannelId, ChannelReference, EntryId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Custom type and field values attached to a draft or entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFields {
    /// Key of the custom type the fields belong to.
    pub type_key: String,
    #[serde(default)]
    pub fields: BTreeMap<String, serde_json::Value>,
}

impl CustomFields {
    pub fn new(type_key: impl Into<String>) -> Self {
        Self {
            type_key: type_key.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Adds or replaces a field value.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }
}

/// Desired state of an inventory entry, as supplied by the caller.
///
/// `sku` is optional on the wire so malformed input can still be parsed and
/// reported; a draft without a non-empty sku never reaches the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryEntryDraft {
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub quantity_on_stock: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restockable_in_days: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_delivery: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supply_channel: Option<ChannelReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<CustomFields>,
}

impl InventoryEntryDraft {
    /// Creates a draft for `sku` with the given stock and no channel.
    pub fn new(sku: impl Into<String>, quantity_on_stock: i64) -> Self {
        Self {
            sku: Some(sku.into()),
            quantity_on_stock,
            restockable_in_days: None,
            expected_delivery: None,
            supply_channel: None,
            custom: None,
        }
    }

    #[must_use]
    pub fn with_supply_channel(mut self, reference: impl Into<ChannelReference>) -> Self {
        self.supply_channel = Some(reference.into());
        self
    }

    #[must_use]
    pub fn with_restockable_in_days(mut self, days: i32) -> Self {
        self.restockable_in_days = Some(days);
        self
    }

    #[must_use]
    pub fn with_expected_delivery(mut self, at: DateTime<Utc>) -> Self {
        self.expected_delivery = Some(at);
        self
    }

    #[must_use]
    pub fn with_custom(mut self, custom: CustomFields) -> Self {
        self.custom = Some(custom);
        self
    }

    /// Returns the sku if present and non-empty.
    pub fn valid_sku(&self) -> Option<&str> {
        self.sku.as_deref().filter(|sku| !sku.is_empty())
    }

    /// Returns the referenced channel key, if any.
    pub fn channel_key(&self) -> Option<&str> {
        self.supply_channel.as_ref().map(ChannelReference::key)
    }
}

/// A draft whose channel reference has been resolved to a store id.
///
/// This is what gets sent to the store on create and compared against the
/// existing entry on update. The channel key it was resolved from is kept so
/// the draft can still be matched and reported by key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedDraft {
    pub sku: String,
    pub quantity_on_stock: i64,
    pub restockable_in_days: Option<i32>,
    pub expected_delivery: Option<DateTime<Utc>>,
    pub supply_channel: Option<ChannelId>,
    pub channel_key: Option<String>,
    pub custom: Option<CustomFields>,
}

impl ResolvedDraft {
    /// Resolves `draft` for `sku`, substituting the given channel
    /// (id, key) pair for the draft's channel reference.
    pub fn new(
        draft: InventoryEntryDraft,
        sku: String,
        channel: Option<(ChannelId, String)>,
    ) -> Self {
        let (supply_channel, channel_key) = match channel {
            Some((id, key)) => (Some(id), Some(key)),
            None => (None, None),
        };
        Self {
            sku,
            quantity_on_stock: draft.quantity_on_stock,
            restockable_in_days: draft.restockable_in_days,
            expected_delivery: draft.expected_delivery,
            supply_channel,
            channel_key,
            custom: draft.custom,
        }
    }
}

/// An inventory entry as observed in the store at fetch time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryEntry {
    pub id: EntryId,
    pub version: u64,
    pub sku: String,
    pub quantity_on_stock: i64,
    pub available_quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restockable_in_days: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_delivery: Option<DateTime<Utc>>,
    /// Channel reference by id only; the key must be looked up.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supply_channel: Option<ChannelId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<CustomFields>,
}

impl InventoryEntry {
    /// Builds the entry the store holds right after creating `draft`.
    pub fn from_resolved(draft: &ResolvedDraft) -> Self {
        Self {
            id: EntryId::new(),
            version: 1,
            sku: draft.sku.clone(),
            quantity_on_stock: draft.quantity_on_stock,
            available_quantity: draft.quantity_on_stock,
            restockable_in_days: draft.restockable_in_days,
            expected_delivery: draft.expected_delivery,
            supply_channel: draft.supply_channel,
            custom: draft.custom.clone(),
        }
    }
}
