//! Inventory sync driver.
//!
//! One [`InventorySync::sync`] call runs the whole pipeline:
//!
//! 1. validate and batch the drafts,
//! 2. fetch the channel registry and, if enabled, create missing channels,
//! 3. per batch (concurrently): fetch existing entries by sku, then resolve,
//!    match and create or update each draft (concurrently within the batch).
//!
//! Nothing fails the call itself. Problems go to the error callback and the
//! `failed` counter; a failed registry fetch ends the call early with the
//! statistics gathered up to that point.

use crate::batch::{partition, CheckedDraft};
use crate::channels::ChannelCache;
use crate::error::{SyncProblem, SyncResult};
use crate::key::SkuChannelKey;
use crate::options::SyncOptions;
use crate::service::InventoryService;
use crate::statistics::{StatisticsSnapshot, SyncStatistics};
use futures::future::join_all;
use invsync_types::{Channel, InventoryEntry, InventoryEntryDraft, ResolvedDraft};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// How a single draft ended up. Never leaves its draft task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DraftOutcome {
    Created,
    Updated,
    /// Matched, but nothing to change (or the store reported no change).
    Unchanged,
    /// The before-create hook dropped the draft.
    Skipped,
    Failed,
}

/// Syncs inventory entry drafts into a remote store.
pub struct InventorySync {
    service: Arc<dyn InventoryService>,
    options: SyncOptions,
}

impl InventorySync {
    pub fn new(service: Arc<dyn InventoryService>, options: SyncOptions) -> Self {
        Self { service, options }
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Syncs `drafts` and returns the final statistics.
    ///
    /// Drafts are matched to stored entries by sku and supply channel key.
    /// A draft's channel is given either as an expanded channel or as a bare
    /// key; both are resolved to the channel's store id before sending.
    pub async fn sync<I>(&self, drafts: I) -> StatisticsSnapshot
    where
        I: IntoIterator<Item = InventoryEntryDraft>,
    {
        self.sync_nullable(drafts.into_iter().map(Some)).await
    }

    /// Like [`sync`](Self::sync), but accepts absent drafts, which are
    /// reported and counted as failed.
    pub async fn sync_nullable<I>(&self, drafts: I) -> StatisticsSnapshot
    where
        I: IntoIterator<Item = Option<InventoryEntryDraft>>,
    {
        let statistics = SyncStatistics::new();
        self.sync_with(drafts, &statistics).await
    }

    /// Runs a sync accumulating into caller-owned `statistics`, which may be
    /// read for progress while the call is in flight.
    pub async fn sync_with<I>(&self, drafts: I, statistics: &SyncStatistics) -> StatisticsSnapshot
    where
        I: IntoIterator<Item = Option<InventoryEntryDraft>>,
    {
        statistics.start_timer();
        info!(
            "Starting inventory sync (batch size {}, ensure channels: {})",
            self.options.batch_size(),
            self.options.ensure_channels()
        );

        let batches = partition(drafts, &self.options, statistics);

        match self.fetch_channels(&batches).await {
            Ok(channels) => {
                debug!(
                    "Dispatching {} batches against {} known channels",
                    batches.len(),
                    channels.len()
                );
                let channels = &channels;
                join_all(
                    batches
                        .into_iter()
                        .map(|batch| self.process_batch(batch, channels, statistics)),
                )
                .await;
            }
            Err(e) => {
                warn!("Inventory sync aborted: {}", e);
            }
        }

        statistics.stop_timer();
        let snapshot = statistics.snapshot();
        info!("{} ({} ms)", snapshot, snapshot.processing_time_ms);
        snapshot
    }

    // ── Channel bootstrap ────────────────────────────────────────

    /// Builds the channel cache for this call. Only a failed registry fetch
    /// is returned as an error; failed channel creations are reported and
    /// leave their key unresolved.
    async fn fetch_channels(&self, batches: &[Vec<CheckedDraft>]) -> SyncResult<ChannelCache> {
        let existing = match self.service.fetch_all_supply_channels().await {
            Ok(channels) => channels,
            Err(e) => {
                self.options
                    .apply_error_callback(&SyncProblem::ChannelFetchFailed, Some(&e));
                return Err(e);
            }
        };
        let mut cache = ChannelCache::build(existing);

        if self.options.ensure_channels() {
            let missing = cache.missing_keys(batches.iter().flatten().map(|checked| &checked.draft));
            if !missing.is_empty() {
                debug!("Creating {} missing supply channels", missing.len());
            }
            let created = join_all(missing.iter().map(|key| self.create_channel(key))).await;
            for channel in created.into_iter().flatten() {
                cache.insert(channel);
            }
        }

        Ok(cache)
    }

    async fn create_channel(&self, key: &str) -> Option<Channel> {
        match self.service.create_supply_channel(key).await {
            Ok(channel) => {
                debug!("Created supply channel '{}' ({})", channel.key, channel.id);
                Some(channel)
            }
            Err(e) => {
                self.options.apply_error_callback(
                    &SyncProblem::ChannelCreateFailed {
                        key: key.to_owned(),
                    },
                    Some(&e),
                );
                None
            }
        }
    }

    // ── Batch processing ─────────────────────────────────────────

    /// Fetches the batch's stored entries and syncs every draft against
    /// them. A failed fetch abandons only this batch.
    async fn process_batch(
        &self,
        batch: Vec<CheckedDraft>,
        channels: &ChannelCache,
        statistics: &SyncStatistics,
    ) {
        let skus: HashSet<String> = batch.iter().map(|checked| checked.sku.clone()).collect();

        let existing = match self.service.fetch_inventory_entries_by_skus(&skus).await {
            Ok(entries) => index_entries(entries, channels),
            Err(e) => {
                let mut skus: Vec<String> = skus.into_iter().collect();
                skus.sort();
                self.options
                    .apply_error_callback(&SyncProblem::EntryFetchFailed { skus }, Some(&e));
                return;
            }
        };
        debug!(
            "Batch of {} drafts matched against {} stored entries",
            batch.len(),
            existing.len()
        );

        let existing = &existing;
        join_all(
            batch
                .into_iter()
                .map(|checked| self.sync_draft(checked, existing, channels, statistics)),
        )
        .await;
    }

    async fn sync_draft(
        &self,
        checked: CheckedDraft,
        existing: &HashMap<SkuChannelKey, InventoryEntry>,
        channels: &ChannelCache,
        statistics: &SyncStatistics,
    ) {
        let outcome = match resolve_channel(checked, channels) {
            Ok(resolved) => match existing.get(&SkuChannelKey::of_resolved(&resolved)) {
                Some(entry) => self.attempt_update(entry, resolved).await,
                None => self.attempt_create(resolved).await,
            },
            Err(problem) => {
                self.options.apply_error_callback(&problem, None);
                DraftOutcome::Failed
            }
        };

        match outcome {
            DraftOutcome::Created => statistics.increment_created(),
            DraftOutcome::Updated => statistics.increment_updated(),
            DraftOutcome::Failed => statistics.increment_failed(),
            DraftOutcome::Unchanged | DraftOutcome::Skipped => {}
        }
        statistics.increment_processed();
    }

    /// Updates `entry` only if the computed actions are non-empty. Counts as
    /// updated only if the store hands back something different.
    async fn attempt_update(&self, entry: &InventoryEntry, draft: ResolvedDraft) -> DraftOutcome {
        let actions = self.options.action_builder().build_actions(entry, &draft);
        let actions = self.options.apply_before_update(actions, entry, &draft);
        if actions.is_empty() {
            debug!("{} is up to date", SkuChannelKey::of_resolved(&draft));
            return DraftOutcome::Unchanged;
        }

        debug!(
            "Updating {} with {} actions",
            SkuChannelKey::of_resolved(&draft),
            actions.len()
        );
        match self.service.update_inventory_entry(entry, &actions).await {
            Ok(updated) if updated != *entry => DraftOutcome::Updated,
            Ok(_) => DraftOutcome::Unchanged,
            Err(e) => {
                self.options.apply_error_callback(
                    &SyncProblem::UpdateFailed {
                        sku: draft.sku,
                        channel_key: draft.channel_key,
                    },
                    Some(&e),
                );
                DraftOutcome::Failed
            }
        }
    }

    async fn attempt_create(&self, draft: ResolvedDraft) -> DraftOutcome {
        let Some(draft) = self.options.apply_before_create(draft) else {
            return DraftOutcome::Skipped;
        };

        debug!("Creating {}", SkuChannelKey::of_resolved(&draft));
        match self.service.create_inventory_entry(&draft).await {
            Ok(_) => DraftOutcome::Created,
            Err(e) => {
                self.options.apply_error_callback(
                    &SyncProblem::CreateFailed {
                        sku: draft.sku,
                        channel_key: draft.channel_key,
                    },
                    Some(&e),
                );
                DraftOutcome::Failed
            }
        }
    }
}

/// Replaces the draft's channel reference with the channel's store id.
/// Drafts without a channel pass through unchanged.
fn resolve_channel(
    checked: CheckedDraft,
    channels: &ChannelCache,
) -> Result<ResolvedDraft, SyncProblem> {
    let channel = match checked.channel_key() {
        None => None,
        Some(key) => match channels.channel_id(key) {
            Some(id) => Some((id, key.to_owned())),
            None => {
                return Err(SyncProblem::ChannelKeyNotFound {
                    key: key.to_owned(),
                });
            }
        },
    };
    let CheckedDraft { sku, draft } = checked;
    Ok(ResolvedDraft::new(draft, sku, channel))
}

/// Keys stored entries by (sku, channel key). Entries whose channel is not
/// in the cache cannot be matched and are left out.
fn index_entries(
    entries: Vec<InventoryEntry>,
    channels: &ChannelCache,
) -> HashMap<SkuChannelKey, InventoryEntry> {
    entries
        .into_iter()
        .filter_map(|entry| SkuChannelKey::of_entry(&entry, channels).map(|key| (key, entry)))
        .collect()
}
