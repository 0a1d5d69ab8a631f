//! Batched reconciliation of inventory drafts against a remote store.
//!
//! Callers describe the inventory they want as a list of drafts. The engine
//! works out which entries already exist, creates the missing ones, and
//! updates the ones that differ, issuing no call for entries that are
//! already current.
//!
//! # Architecture
//!
//! - **Key**: (sku, supply channel key) identity shared by drafts and entries
//! - **Channels**: per-call cache mapping channel keys to store ids
//! - **Batch**: draft validation and fixed-size batching
//! - **Statistics**: atomic per-call counters and summary
//! - **Options**: batch size, channel creation, callbacks and hooks
//! - **Service**: the remote store seam
//! - **Engine**: orchestrates the sync process
//!
//! ## Sync Process
//!
//! 1. **Validate**: reject absent drafts and drafts without a sku
//! 2. **Bootstrap**: fetch supply channels, create missing ones if enabled
//! 3. **Fetch**: per batch, load stored entries by sku
//! 4. **Resolve**: swap each draft's channel key for the channel id
//! 5. **Dispatch**: create unmatched drafts, update matched ones that differ
//!
//! # Example
//!
//! ```
//! use invsync_engine::{InMemoryInventoryService, InventorySync, SyncOptions};
//! use invsync_types::InventoryEntryDraft;
//! use std::sync::Arc;
//!
//! # tokio_test_block_on(async {
//! let store = Arc::new(InMemoryInventoryService::new());
//! let options = SyncOptions::builder().batch_size(50).ensure_channels(true).build();
//! let sync = InventorySync::new(store, options);
//!
//! let stats = sync
//!     .sync(vec![InventoryEntryDraft::new("sku-1", 10).with_supply_channel("berlin")])
//!     .await;
//! assert_eq!(stats.created, 1);
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

pub mod actions;
pub mod batch;
pub mod channels;
mod engine;
mod error;
pub mod key;
pub mod memory;
pub mod options;
pub mod service;
pub mod statistics;

pub use actions::{apply_actions, build_actions, ActionBuilder, DefaultActionBuilder};
pub use batch::{partition, CheckedDraft};
pub use channels::ChannelCache;
pub use engine::InventorySync;
pub use error::{SyncError, SyncProblem, SyncResult};
pub use key::SkuChannelKey;
pub use memory::{CallCounts, InMemoryInventoryService, StoreSnapshot};
pub use options::{
    BeforeCreateCallback, BeforeUpdateCallback, ErrorCallback, SyncConfig, SyncOptions,
    SyncOptionsBuilder, DEFAULT_BATCH_SIZE,
};
pub use service::InventoryService;
pub use statistics::{StatisticsSnapshot, SyncStatistics};
