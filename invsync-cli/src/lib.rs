//! File handling and the sync run behind the `invsync` binary.
//!
//! The store is a JSON snapshot of channels and entries loaded into an
//! [`InMemoryInventoryService`]; after the sync the snapshot is written back.

use anyhow::{Context, Result};
use invsync_engine::{
    InMemoryInventoryService, InventorySync, StatisticsSnapshot, StoreSnapshot, SyncConfig,
    SyncOptionsBuilder,
};
use invsync_types::InventoryEntryDraft;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Everything one run needs.
#[derive(Debug, Clone)]
pub struct SyncJob {
    pub drafts: PathBuf,
    pub store: PathBuf,
    pub config: SyncConfig,
    /// Sync against the loaded store but leave the file untouched.
    pub dry_run: bool,
}

/// Reads a JSON array of drafts. `null` elements are kept so the engine can
/// report them.
pub fn load_drafts(path: &Path) -> Result<Vec<Option<InventoryEntryDraft>>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read drafts from {:?}", path))?;
    invsync_types::parse_drafts(&json).with_context(|| format!("Invalid drafts in {:?}", path))
}

/// Reads a store snapshot. A missing file is an empty store.
pub fn load_store(path: &Path) -> Result<StoreSnapshot> {
    if !path.exists() {
        warn!("Store {:?} not found, starting from an empty store", path);
        return Ok(StoreSnapshot::default());
    }
    let json =
        fs::read_to_string(path).with_context(|| format!("Failed to read store {:?}", path))?;
    serde_json::from_str(&json).with_context(|| format!("Invalid store snapshot in {:?}", path))
}

pub fn save_store(path: &Path, snapshot: &StoreSnapshot) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot).context("Failed to encode store")?;
    fs::write(path, json).with_context(|| format!("Failed to write store {:?}", path))
}

/// Loads both files, syncs, and saves the store unless this is a dry run.
pub async fn run(job: &SyncJob) -> Result<StatisticsSnapshot> {
    let drafts = load_drafts(&job.drafts)?;
    let snapshot = load_store(&job.store)?;
    info!(
        "Loaded {} drafts and a store of {} channels / {} entries",
        drafts.len(),
        snapshot.channels.len(),
        snapshot.entries.len()
    );

    let store = Arc::new(InMemoryInventoryService::from_snapshot(snapshot));
    let options = SyncOptionsBuilder::from_config(job.config.clone()).build();
    let sync = InventorySync::new(store.clone(), options);
    let stats = sync.sync_nullable(drafts).await;

    let calls = store.calls();
    debug!(
        "Store calls: {} channel creates, {} entry fetches, {} creates, {} updates",
        calls.channel_creates, calls.entry_fetches, calls.entry_creates, calls.entry_updates
    );

    if job.dry_run {
        info!("Dry run, leaving {:?} unchanged", job.store);
    } else {
        save_store(&job.store, &store.snapshot())?;
    }
    Ok(stats)
}
