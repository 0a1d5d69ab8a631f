use invsync_types::{
    parse_drafts, Channel, ChannelId, ChannelReference, ChannelRole, CustomFields,
    InventoryEntry, InventoryEntryDraft, ResolvedDraft, UpdateAction,
};
use pretty_assertions::assert_eq;
use serde_json::json;

// ── Drafts ────────────────────────────────────────────────────────

#[test]
fn draft_builder_sets_fields() {
    let draft = InventoryEntryDraft::new("sku-1", 5)
        .with_supply_channel("warehouse")
        .with_restockable_in_days(3)
        .with_custom(CustomFields::new("stock-info").with_field("bin", json!("A1")));

    assert_eq!(draft.valid_sku(), Some("sku-1"));
    assert_eq!(draft.quantity_on_stock, 5);
    assert_eq!(draft.channel_key(), Some("warehouse"));
    assert_eq!(draft.restockable_in_days, Some(3));
    assert_eq!(draft.custom.unwrap().fields["bin"], json!("A1"));
}

#[test]
fn empty_sku_is_not_valid() {
    let mut draft = InventoryEntryDraft::new("", 1);
    assert_eq!(draft.valid_sku(), None);
    draft.sku = None;
    assert_eq!(draft.valid_sku(), None);
}

#[test]
fn expanded_reference_uses_channel_key() {
    let channel = Channel::new("berlin");
    let draft = InventoryEntryDraft::new("sku-1", 1).with_supply_channel(channel);
    assert_eq!(draft.channel_key(), Some("berlin"));
}

#[test]
fn key_reference_uses_placeholder() {
    let reference = ChannelReference::of_key("munich");
    assert_eq!(reference.key(), "munich");
}

#[test]
fn parse_drafts_keeps_nulls() {
    let drafts = parse_drafts(
        r#"[
            {"sku": "a", "quantityOnStock": 2, "supplyChannel": "berlin"},
            null,
            {"quantityOnStock": 1}
        ]"#,
    )
    .unwrap();

    assert_eq!(drafts.len(), 3);
    let first = drafts[0].as_ref().unwrap();
    assert_eq!(first.channel_key(), Some("berlin"));
    assert!(drafts[1].is_none());
    assert_eq!(drafts[2].as_ref().unwrap().valid_sku(), None);
}

#[test]
fn parse_drafts_accepts_expanded_channel() {
    let id = ChannelId::new();
    let json = format!(
        r#"[{{"sku": "a", "quantityOnStock": 2, "supplyChannel": {{"id": "{id}", "key": "berlin"}}}}]"#
    );
    let drafts = parse_drafts(&json).unwrap();
    match drafts[0].as_ref().unwrap().supply_channel.as_ref().unwrap() {
        ChannelReference::Expanded(channel) => {
            assert_eq!(channel.id, id);
            assert_eq!(channel.key, "berlin");
        }
        other => panic!("Expected expanded channel, got {other:?}"),
    }
}

#[test]
fn parse_drafts_rejects_non_array() {
    assert!(parse_drafts(r#"{"sku": "a"}"#).is_err());
}

// ── Resolved drafts and entries ───────────────────────────────────

#[test]
fn resolved_draft_substitutes_channel_id() {
    let id = ChannelId::new();
    let draft = InventoryEntryDraft::new("sku-1", 4).with_supply_channel("berlin");
    let resolved = ResolvedDraft::new(draft, "sku-1".into(), Some((id, "berlin".into())));

    assert_eq!(resolved.supply_channel, Some(id));
    assert_eq!(resolved.channel_key.as_deref(), Some("berlin"));
    assert_eq!(resolved.quantity_on_stock, 4);
}

#[test]
fn entry_from_resolved_mirrors_draft() {
    let draft = InventoryEntryDraft::new("sku-1", 9).with_restockable_in_days(2);
    let resolved = ResolvedDraft::new(draft, "sku-1".into(), None);
    let entry = InventoryEntry::from_resolved(&resolved);

    assert_eq!(entry.sku, "sku-1");
    assert_eq!(entry.version, 1);
    assert_eq!(entry.quantity_on_stock, 9);
    assert_eq!(entry.available_quantity, 9);
    assert_eq!(entry.restockable_in_days, Some(2));
    assert_eq!(entry.supply_channel, None);
}

#[test]
fn new_channel_has_supply_role() {
    let channel = Channel::new("berlin");
    assert_eq!(channel.roles, vec![ChannelRole::InventorySupply]);
}

// ── Update actions ────────────────────────────────────────────────

#[test]
fn update_action_serializes_with_tag() {
    let action = UpdateAction::ChangeQuantity { quantity: 7 };
    assert_eq!(
        serde_json::to_value(&action).unwrap(),
        json!({"action": "changeQuantity", "quantity": 7})
    );
    assert_eq!(action.name(), "changeQuantity");
}

#[test]
fn set_restockable_serializes_camel_case_field() {
    let action = UpdateAction::SetRestockableInDays {
        restockable_in_days: Some(3),
    };
    assert_eq!(
        serde_json::to_value(&action).unwrap(),
        json!({"action": "setRestockableInDays", "restockableInDays": 3})
    );
}

// ── Properties ────────────────────────────────────────────────────

mod draft_properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Only a non-empty sku is valid, and it is returned unchanged.
        #[test]
        fn valid_sku_iff_non_empty(sku in "[a-zA-Z0-9-]{0,12}", quantity in any::<i64>()) {
            let draft = InventoryEntryDraft::new(sku.clone(), quantity);
            prop_assert_eq!(draft.valid_sku().is_some(), !sku.is_empty());
            if let Some(valid) = draft.valid_sku() {
                prop_assert_eq!(valid, sku.as_str());
            }
        }

        /// A bare key and an expanded channel with that key name the same channel.
        #[test]
        fn reference_forms_share_key(key in "[a-z][a-z0-9-]{0,15}") {
            let by_key = ChannelReference::of_key(key.clone());
            let expanded = ChannelReference::from(Channel::new(key.clone()));
            prop_assert_eq!(by_key.key(), expanded.key());
        }
    }
}
