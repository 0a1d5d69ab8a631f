//! Update actions sent to the store to change an existing entry.

use crate::{ChannelId, CustomFields};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single field-level change to an inventory entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum UpdateAction {
    /// Sets the quantity on stock. The store adjusts the available quantity
    /// by the same delta.
    #[serde(rename_all = "camelCase")]
    ChangeQuantity { quantity: i64 },

    #[serde(rename_all = "camelCase")]
    SetRestockableInDays { restockable_in_days: Option<i32> },

    #[serde(rename_all = "camelCase")]
    SetExpectedDelivery {
        expected_delivery: Option<DateTime<Utc>>,
    },

    #[serde(rename_all = "camelCase")]
    SetSupplyChannel { supply_channel: Option<ChannelId> },

    /// Replaces the custom type and all its fields (or removes them).
    #[serde(rename_all = "camelCase")]
    SetCustomType { custom: Option<CustomFields> },

    /// Sets a single field of the current custom type; `None` removes it.
    #[serde(rename_all = "camelCase")]
    SetCustomField {
        name: String,
        value: Option<serde_json::Value>,
    },
}

impl UpdateAction {
    /// Short action name, as used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ChangeQuantity { .. } => "changeQuantity",
            Self::SetRestockableInDays { .. } => "setRestockableInDays",
            Self::SetExpectedDelivery { .. } => "setExpectedDelivery",
            Self::SetSupplyChannel { .. } => "setSupplyChannel",
            Self::SetCustomType { .. } => "setCustomType",
            Self::SetCustomField { .. } => "setCustomField",
        }
    }
}
