//! Remote store abstraction.
//!
//! The engine never talks to a store directly. Everything it needs from the
//! remote side goes through [`InventoryService`], so the same engine runs
//! against an HTTP client, a database, or the in-memory store used in tests.

use crate::error::SyncResult;
use async_trait::async_trait;
use invsync_types::{Channel, InventoryEntry, ResolvedDraft, UpdateAction};
use std::collections::HashSet;

/// Remote operations the sync engine depends on.
#[async_trait]
pub trait InventoryService: Send + Sync {
    /// Fetches every supply channel in the store.
    async fn fetch_all_supply_channels(&self) -> SyncResult<Vec<Channel>>;

    /// Creates an inventory-supply channel with the given key.
    async fn create_supply_channel(&self, key: &str) -> SyncResult<Channel>;

    /// Fetches all inventory entries whose sku is in `skus`, for any channel.
    async fn fetch_inventory_entries_by_skus(
        &self,
        skus: &HashSet<String>,
    ) -> SyncResult<Vec<InventoryEntry>>;

    /// Creates a new inventory entry from a resolved draft.
    async fn create_inventory_entry(&self, draft: &ResolvedDraft) -> SyncResult<InventoryEntry>;

    /// Applies `actions` to `entry` and returns the entry as stored afterwards.
    async fn update_inventory_entry(
        &self,
        entry: &InventoryEntry,
        actions: &[UpdateAction],
    ) -> SyncResult<InventoryEntry>;
}
