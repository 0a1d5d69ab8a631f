//! invsync
//!
//! Syncs a file of inventory entry drafts into a JSON-file store.
//!
//! Usage:
//!   invsync --drafts drafts.json --store store.json --ensure-channels
//!
//! Problems with individual drafts are logged and counted; the exit status
//! is non-zero only when a file cannot be read, parsed or written.

use anyhow::Result;
use clap::Parser;
use invsync_cli::{run, SyncJob};
use invsync_engine::{SyncConfig, DEFAULT_BATCH_SIZE};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "invsync")]
#[command(about = "Sync inventory entry drafts into a store")]
struct Args {
    /// JSON array of inventory entry drafts
    #[arg(short, long)]
    drafts: PathBuf,

    /// JSON store snapshot, created if missing
    #[arg(short, long)]
    store: PathBuf,

    /// Drafts fetched and dispatched together
    #[arg(short, long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Create supply channels the drafts reference but the store lacks
    #[arg(long)]
    ensure_channels: bool,

    /// Run the sync without writing the store back
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    let job = SyncJob {
        drafts: args.drafts,
        store: args.store,
        config: SyncConfig {
            batch_size: args.batch_size,
            ensure_channels: args.ensure_channels,
        },
        dry_run: args.dry_run,
    };
    let stats = run(&job).await?;

    println!("{}", stats);
    Ok(())
}
