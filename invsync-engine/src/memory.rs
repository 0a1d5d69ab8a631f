//! In-memory inventory store.
//!
//! Implements [`InventoryService`] over plain maps. Used by the CLI as a
//! file-backed store and by tests, which can also make individual calls
//! fail and count how often each call was made.

use crate::actions::apply_actions;
use crate::error::{SyncError, SyncResult};
use crate::service::InventoryService;
use async_trait::async_trait;
use invsync_types::{Channel, ChannelId, EntryId, InventoryEntry, ResolvedDraft, UpdateAction};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Serializable contents of the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreSnapshot {
    pub channels: Vec<Channel>,
    pub entries: Vec<InventoryEntry>,
}

/// How many times each remote operation was called.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub channel_fetches: usize,
    pub channel_creates: usize,
    pub entry_fetches: usize,
    pub entry_creates: usize,
    pub entry_updates: usize,
}

#[derive(Debug, Default)]
struct State {
    channels: BTreeMap<ChannelId, Channel>,
    entries: BTreeMap<EntryId, InventoryEntry>,
}

#[derive(Debug, Default)]
struct Faults {
    channel_fetch: bool,
    entry_fetch: bool,
    entry_fetch_skus: HashSet<String>,
    channel_keys: HashSet<String>,
    create_skus: HashSet<String>,
    update_skus: HashSet<String>,
}

#[derive(Debug, Default)]
struct Counters {
    channel_fetches: AtomicUsize,
    channel_creates: AtomicUsize,
    entry_fetches: AtomicUsize,
    entry_creates: AtomicUsize,
    entry_updates: AtomicUsize,
}

/// A store that lives in memory.
#[derive(Debug, Default)]
pub struct InMemoryInventoryService {
    state: Mutex<State>,
    faults: Mutex<Faults>,
    counters: Counters,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn count(counter: &AtomicUsize) {
    counter.fetch_add(1, Ordering::SeqCst);
}

impl InMemoryInventoryService {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the snapshot's channels and entries.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let store = Self::new();
        {
            let mut state = lock(&store.state);
            state.channels = snapshot
                .channels
                .into_iter()
                .map(|channel| (channel.id, channel))
                .collect();
            state.entries = snapshot
                .entries
                .into_iter()
                .map(|entry| (entry.id, entry))
                .collect();
        }
        store
    }

    /// Current contents, ordered by id.
    pub fn snapshot(&self) -> StoreSnapshot {
        let state = lock(&self.state);
        StoreSnapshot {
            channels: state.channels.values().cloned().collect(),
            entries: state.entries.values().cloned().collect(),
        }
    }

    /// Adds a channel directly, bypassing call counting.
    pub fn insert_channel(&self, channel: Channel) {
        lock(&self.state).channels.insert(channel.id, channel);
    }

    /// Adds an entry directly, bypassing call counting.
    pub fn insert_entry(&self, entry: InventoryEntry) {
        lock(&self.state).entries.insert(entry.id, entry);
    }

    pub fn channels(&self) -> Vec<Channel> {
        lock(&self.state).channels.values().cloned().collect()
    }

    pub fn entries(&self) -> Vec<InventoryEntry> {
        lock(&self.state).entries.values().cloned().collect()
    }

    pub fn calls(&self) -> CallCounts {
        let c = &self.counters;
        CallCounts {
            channel_fetches: c.channel_fetches.load(Ordering::SeqCst),
            channel_creates: c.channel_creates.load(Ordering::SeqCst),
            entry_fetches: c.entry_fetches.load(Ordering::SeqCst),
            entry_creates: c.entry_creates.load(Ordering::SeqCst),
            entry_updates: c.entry_updates.load(Ordering::SeqCst),
        }
    }

    // ── Failure injection ────────────────────────────────────────

    /// Makes every channel registry fetch fail.
    pub fn fail_channel_fetch(&self) {
        lock(&self.faults).channel_fetch = true;
    }

    /// Makes every bulk entry fetch fail.
    pub fn fail_entry_fetch(&self) {
        lock(&self.faults).entry_fetch = true;
    }

    /// Makes any bulk entry fetch whose sku set contains `sku` fail.
    pub fn fail_entry_fetch_for(&self, sku: impl Into<String>) {
        lock(&self.faults).entry_fetch_skus.insert(sku.into());
    }

    /// Makes creating a channel with `key` fail.
    pub fn fail_channel_creation(&self, key: impl Into<String>) {
        lock(&self.faults).channel_keys.insert(key.into());
    }

    /// Makes creating any entry for `sku` fail.
    pub fn fail_create(&self, sku: impl Into<String>) {
        lock(&self.faults).create_skus.insert(sku.into());
    }

    /// Makes updating any entry for `sku` fail.
    pub fn fail_update(&self, sku: impl Into<String>) {
        lock(&self.faults).update_skus.insert(sku.into());
    }
}

#[async_trait]
impl InventoryService for InMemoryInventoryService {
    async fn fetch_all_supply_channels(&self) -> SyncResult<Vec<Channel>> {
        count(&self.counters.channel_fetches);
        if lock(&self.faults).channel_fetch {
            return Err(SyncError::Remote("channel registry unavailable".into()));
        }
        Ok(self.channels())
    }

    async fn create_supply_channel(&self, key: &str) -> SyncResult<Channel> {
        count(&self.counters.channel_creates);
        if lock(&self.faults).channel_keys.contains(key) {
            return Err(SyncError::Remote(format!("cannot create channel '{key}'")));
        }
        let mut state = lock(&self.state);
        if state.channels.values().any(|channel| channel.key == key) {
            return Err(SyncError::Conflict(format!(
                "a channel with key '{key}' already exists"
            )));
        }
        let channel = Channel::new(key);
        state.channels.insert(channel.id, channel.clone());
        Ok(channel)
    }

    async fn fetch_inventory_entries_by_skus(
        &self,
        skus: &HashSet<String>,
    ) -> SyncResult<Vec<InventoryEntry>> {
        count(&self.counters.entry_fetches);
        {
            let faults = lock(&self.faults);
            if faults.entry_fetch || !faults.entry_fetch_skus.is_disjoint(skus) {
                return Err(SyncError::Remote("inventory query failed".into()));
            }
        }
        Ok(lock(&self.state)
            .entries
            .values()
            .filter(|entry| skus.contains(&entry.sku))
            .cloned()
            .collect())
    }

    async fn create_inventory_entry(&self, draft: &ResolvedDraft) -> SyncResult<InventoryEntry> {
        count(&self.counters.entry_creates);
        if lock(&self.faults).create_skus.contains(&draft.sku) {
            return Err(SyncError::Validation(format!(
                "entry for sku '{}' rejected",
                draft.sku
            )));
        }
        let mut state = lock(&self.state);
        let duplicate = state.entries.values().any(|entry| {
            entry.sku == draft.sku && entry.supply_channel == draft.supply_channel
        });
        if duplicate {
            return Err(SyncError::Conflict(format!(
                "an entry for sku '{}' and this supply channel already exists",
                draft.sku
            )));
        }
        if let Some(id) = draft.supply_channel {
            if !state.channels.contains_key(&id) {
                return Err(SyncError::Validation(format!(
                    "supply channel {id} does not exist"
                )));
            }
        }
        let entry = InventoryEntry::from_resolved(draft);
        state.entries.insert(entry.id, entry.clone());
        Ok(entry)
    }

    async fn update_inventory_entry(
        &self,
        entry: &InventoryEntry,
        actions: &[UpdateAction],
    ) -> SyncResult<InventoryEntry> {
        count(&self.counters.entry_updates);
        if lock(&self.faults).update_skus.contains(&entry.sku) {
            return Err(SyncError::Remote(format!(
                "update of sku '{}' timed out",
                entry.sku
            )));
        }
        let mut state = lock(&self.state);
        let stored = state
            .entries
            .get_mut(&entry.id)
            .ok_or_else(|| SyncError::NotFound(format!("inventory entry {}", entry.id)))?;
        if stored.version != entry.version {
            return Err(SyncError::Conflict(format!(
                "expected version {} but found {}",
                entry.version, stored.version
            )));
        }
        *stored = apply_actions(stored, actions)?;
        Ok(stored.clone())
    }
}
