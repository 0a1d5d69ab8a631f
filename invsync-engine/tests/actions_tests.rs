use chrono::{TimeZone, Utc};
use invsync_engine::{
    apply_actions, build_actions, ActionBuilder, DefaultActionBuilder, SyncError,
};
use invsync_types::{
    ChannelId, CustomFields, InventoryEntry, InventoryEntryDraft, ResolvedDraft, UpdateAction,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn resolve(draft: InventoryEntryDraft) -> ResolvedDraft {
    let sku = draft.sku.clone().unwrap_or_default();
    ResolvedDraft::new(draft, sku, None)
}

fn stored(draft: InventoryEntryDraft) -> InventoryEntry {
    InventoryEntry::from_resolved(&resolve(draft))
}

// ── Diffing ───────────────────────────────────────────────────────

#[test]
fn entry_created_from_draft_needs_no_actions() {
    let draft = InventoryEntryDraft::new("sku", 5)
        .with_restockable_in_days(3)
        .with_expected_delivery(Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap())
        .with_custom(CustomFields::new("stock-info").with_field("bin", json!("A-1")));
    let entry = stored(draft.clone());

    assert!(build_actions(&entry, &resolve(draft)).is_empty());
}

#[test]
fn changed_scalars_produce_one_action_each() {
    let entry = stored(InventoryEntryDraft::new("sku", 5).with_restockable_in_days(3));
    let at = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
    let draft = resolve(InventoryEntryDraft::new("sku", 9).with_expected_delivery(at));

    assert_eq!(
        build_actions(&entry, &draft),
        vec![
            UpdateAction::ChangeQuantity { quantity: 9 },
            UpdateAction::SetRestockableInDays {
                restockable_in_days: None
            },
            UpdateAction::SetExpectedDelivery {
                expected_delivery: Some(at)
            },
        ]
    );
}

#[test]
fn channel_change_is_detected() {
    let entry = stored(InventoryEntryDraft::new("sku", 1));
    let channel = ChannelId::new();
    let draft = ResolvedDraft::new(
        InventoryEntryDraft::new("sku", 1),
        "sku".into(),
        Some((channel, "berlin".into())),
    );

    assert_eq!(
        build_actions(&entry, &draft),
        vec![UpdateAction::SetSupplyChannel {
            supply_channel: Some(channel)
        }]
    );
}

#[test]
fn same_custom_type_diffs_per_field() {
    let entry = stored(
        InventoryEntryDraft::new("sku", 1).with_custom(
            CustomFields::new("stock-info")
                .with_field("bin", json!("A-1"))
                .with_field("note", json!("fragile")),
        ),
    );
    let draft = resolve(
        InventoryEntryDraft::new("sku", 1).with_custom(
            CustomFields::new("stock-info")
                .with_field("bin", json!("B-7"))
                .with_field("shelf", json!(4)),
        ),
    );

    assert_eq!(
        build_actions(&entry, &draft),
        vec![
            UpdateAction::SetCustomField {
                name: "bin".into(),
                value: Some(json!("B-7"))
            },
            UpdateAction::SetCustomField {
                name: "shelf".into(),
                value: Some(json!(4))
            },
            UpdateAction::SetCustomField {
                name: "note".into(),
                value: None
            },
        ]
    );
}

#[test]
fn custom_type_switch_replaces_everything() {
    let entry = stored(
        InventoryEntryDraft::new("sku", 1)
            .with_custom(CustomFields::new("old").with_field("a", json!(1))),
    );
    let custom = CustomFields::new("new").with_field("a", json!(1));
    let draft = resolve(InventoryEntryDraft::new("sku", 1).with_custom(custom.clone()));

    assert_eq!(
        build_actions(&entry, &draft),
        vec![UpdateAction::SetCustomType {
            custom: Some(custom)
        }]
    );
}

#[test]
fn removing_custom_type_clears_it() {
    let entry = stored(InventoryEntryDraft::new("sku", 1).with_custom(CustomFields::new("t")));
    let draft = resolve(InventoryEntryDraft::new("sku", 1));

    assert_eq!(
        build_actions(&entry, &draft),
        vec![UpdateAction::SetCustomType { custom: None }]
    );
}

#[test]
fn default_builder_delegates_to_build_actions() {
    let entry = stored(InventoryEntryDraft::new("sku", 1));
    let draft = resolve(InventoryEntryDraft::new("sku", 2));
    assert_eq!(
        DefaultActionBuilder.build_actions(&entry, &draft),
        build_actions(&entry, &draft)
    );
}

#[test]
fn closures_are_action_builders() {
    let only_quantity = |existing: &InventoryEntry, draft: &ResolvedDraft| {
        build_actions(existing, draft)
            .into_iter()
            .filter(|action| matches!(action, UpdateAction::ChangeQuantity { .. }))
            .collect::<Vec<_>>()
    };
    let entry = stored(InventoryEntryDraft::new("sku", 1));
    let draft = resolve(InventoryEntryDraft::new("sku", 2).with_restockable_in_days(4));

    assert_eq!(
        only_quantity.build_actions(&entry, &draft),
        vec![UpdateAction::ChangeQuantity { quantity: 2 }]
    );
}

// ── Applying ──────────────────────────────────────────────────────

#[test]
fn applying_built_actions_converges() {
    let entry = stored(
        InventoryEntryDraft::new("sku", 5)
            .with_custom(CustomFields::new("t").with_field("a", json!(1))),
    );
    let draft = resolve(
        InventoryEntryDraft::new("sku", 8)
            .with_restockable_in_days(2)
            .with_custom(CustomFields::new("t").with_field("b", json!(2))),
    );

    let updated = apply_actions(&entry, &build_actions(&entry, &draft)).unwrap();

    assert!(build_actions(&updated, &draft).is_empty());
    assert_eq!(updated.version, entry.version + 1);
    assert_eq!(updated.id, entry.id);
}

#[test]
fn quantity_change_moves_available_by_delta() {
    let mut entry = stored(InventoryEntryDraft::new("sku", 10));
    entry.available_quantity = 6;

    let updated =
        apply_actions(&entry, &[UpdateAction::ChangeQuantity { quantity: 7 }]).unwrap();

    assert_eq!(updated.quantity_on_stock, 7);
    assert_eq!(updated.available_quantity, 3);
}

#[test]
fn no_actions_leaves_entry_untouched() {
    let entry = stored(InventoryEntryDraft::new("sku", 10));
    assert_eq!(apply_actions(&entry, &[]).unwrap(), entry);
}

#[test]
fn overflowing_quantity_change_is_rejected() {
    let entry = stored(InventoryEntryDraft::new("sku", -5));

    let err = apply_actions(&entry, &[UpdateAction::ChangeQuantity { quantity: i64::MAX }])
        .unwrap_err();

    assert!(matches!(err, SyncError::Validation(_)));
    assert!(err.to_string().contains("overflows"));
}

#[test]
fn available_overflow_is_rejected() {
    let mut entry = stored(InventoryEntryDraft::new("sku", 0));
    entry.available_quantity = i64::MAX;

    let result = apply_actions(&entry, &[UpdateAction::ChangeQuantity { quantity: 1 }]);

    assert!(matches!(result, Err(SyncError::Validation(_))));
}
