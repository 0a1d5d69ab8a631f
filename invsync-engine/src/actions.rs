//! Update action computation.
//!
//! The engine treats the diff between an existing entry and a resolved draft
//! as an opaque function behind [`ActionBuilder`]. [`DefaultActionBuilder`]
//! compares every payload field of an inventory entry.

use crate::error::{SyncError, SyncResult};
use invsync_types::{CustomFields, InventoryEntry, ResolvedDraft, UpdateAction};

/// Computes the actions needed to turn `existing` into `draft`.
///
/// An empty result means the entry is already up to date and no remote call
/// is made.
pub trait ActionBuilder: Send + Sync {
    fn build_actions(&self, existing: &InventoryEntry, draft: &ResolvedDraft) -> Vec<UpdateAction>;
}

impl<F> ActionBuilder for F
where
    F: Fn(&InventoryEntry, &ResolvedDraft) -> Vec<UpdateAction> + Send + Sync,
{
    fn build_actions(&self, existing: &InventoryEntry, draft: &ResolvedDraft) -> Vec<UpdateAction> {
        self(existing, draft)
    }
}

/// Field-by-field comparison of all inventory entry fields except the sku.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultActionBuilder;

impl ActionBuilder for DefaultActionBuilder {
    fn build_actions(&self, existing: &InventoryEntry, draft: &ResolvedDraft) -> Vec<UpdateAction> {
        build_actions(existing, draft)
    }
}

/// Compares quantity, restock days, expected delivery, supply channel and
/// custom fields.
pub fn build_actions(existing: &InventoryEntry, draft: &ResolvedDraft) -> Vec<UpdateAction> {
    let mut actions = Vec::new();

    if existing.quantity_on_stock != draft.quantity_on_stock {
        actions.push(UpdateAction::ChangeQuantity {
            quantity: draft.quantity_on_stock,
        });
    }
    if existing.restockable_in_days != draft.restockable_in_days {
        actions.push(UpdateAction::SetRestockableInDays {
            restockable_in_days: draft.restockable_in_days,
        });
    }
    if existing.expected_delivery != draft.expected_delivery {
        actions.push(UpdateAction::SetExpectedDelivery {
            expected_delivery: draft.expected_delivery,
        });
    }
    if existing.supply_channel != draft.supply_channel {
        actions.push(UpdateAction::SetSupplyChannel {
            supply_channel: draft.supply_channel,
        });
    }
    actions.extend(custom_field_actions(
        existing.custom.as_ref(),
        draft.custom.as_ref(),
    ));

    actions
}

fn custom_field_actions(
    existing: Option<&CustomFields>,
    desired: Option<&CustomFields>,
) -> Vec<UpdateAction> {
    match (existing, desired) {
        (None, None) => Vec::new(),
        (Some(old), Some(new)) if old.type_key == new.type_key => {
            let mut actions: Vec<UpdateAction> = new
                .fields
                .iter()
                .filter(|(name, value)| old.fields.get(*name) != Some(*value))
                .map(|(name, value)| UpdateAction::SetCustomField {
                    name: name.clone(),
                    value: Some(value.clone()),
                })
                .collect();
            actions.extend(
                old.fields
                    .keys()
                    .filter(|name| !new.fields.contains_key(*name))
                    .map(|name| UpdateAction::SetCustomField {
                        name: name.clone(),
                        value: None,
                    }),
            );
            actions
        }
        // Type added, removed or switched: replace wholesale.
        (_, desired) => vec![UpdateAction::SetCustomType {
            custom: desired.cloned(),
        }],
    }
}

/// Applies `actions` to a copy of `entry`, the way the store does.
///
/// The version is bumped once if any action was applied. Quantity changes
/// move the available quantity by the same delta; a delta that does not fit
/// in an `i64` is rejected with [`SyncError::Validation`].
pub fn apply_actions(
    entry: &InventoryEntry,
    actions: &[UpdateAction],
) -> SyncResult<InventoryEntry> {
    let mut updated = entry.clone();
    for action in actions {
        match action {
            UpdateAction::ChangeQuantity { quantity } => {
                let available = quantity
                    .checked_sub(updated.quantity_on_stock)
                    .and_then(|delta| updated.available_quantity.checked_add(delta))
                    .ok_or_else(|| {
                        SyncError::Validation(format!(
                            "quantity change of sku '{}' from {} to {} overflows",
                            updated.sku, updated.quantity_on_stock, quantity
                        ))
                    })?;
                updated.quantity_on_stock = *quantity;
                updated.available_quantity = available;
            }
            UpdateAction::SetRestockableInDays { restockable_in_days } => {
                updated.restockable_in_days = *restockable_in_days;
            }
            UpdateAction::SetExpectedDelivery { expected_delivery } => {
                updated.expected_delivery = *expected_delivery;
            }
            UpdateAction::SetSupplyChannel { supply_channel } => {
                updated.supply_channel = *supply_channel;
            }
            UpdateAction::SetCustomType { custom } => {
                updated.custom = custom.clone();
            }
            UpdateAction::SetCustomField { name, value } => {
                if let Some(custom) = updated.custom.as_mut() {
                    match value {
                        Some(value) => {
                            custom.fields.insert(name.clone(), value.clone());
                        }
                        None => {
                            custom.fields.remove(name);
                        }
                    }
                }
            }
        }
    }
    if !actions.is_empty() {
        updated.version += 1;
    }
    Ok(updated)
}
