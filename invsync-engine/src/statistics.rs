//! Per-call sync statistics.
//!
//! Counters are shared by every in-flight batch and draft task of one sync
//! call, so they are plain atomics. They only ever grow.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Thread-safe tracker for accumulating statistics during a sync call.
#[derive(Debug, Default)]
pub struct SyncStatistics {
    processed: AtomicU64,
    created: AtomicU64,
    updated: AtomicU64,
    failed: AtomicU64,
    timer: Mutex<Timer>,
}

#[derive(Debug, Default)]
struct Timer {
    started: Option<Instant>,
    elapsed: Option<Duration>,
}

impl SyncStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_processed(&self) {
        self.processed.fetch_add(1, Ordering::SeqCst);
    }

    pub fn increment_created(&self) {
        self.created.fetch_add(1, Ordering::SeqCst);
    }

    pub fn increment_updated(&self) {
        self.updated.fetch_add(1, Ordering::SeqCst);
    }

    pub fn increment_failed(&self) {
        self.failed.fetch_add(1, Ordering::SeqCst);
    }

    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::SeqCst)
    }

    pub fn created(&self) -> u64 {
        self.created.load(Ordering::SeqCst)
    }

    pub fn updated(&self) -> u64 {
        self.updated.load(Ordering::SeqCst)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::SeqCst)
    }

    /// Starts (or restarts) the processing timer.
    pub fn start_timer(&self) {
        if let Ok(mut timer) = self.timer.lock() {
            timer.started = Some(Instant::now());
            timer.elapsed = None;
        }
    }

    /// Freezes the processing time measured since [`start_timer`](Self::start_timer).
    pub fn stop_timer(&self) {
        if let Ok(mut timer) = self.timer.lock() {
            timer.elapsed = timer.started.map(|started| started.elapsed());
        }
    }

    /// Processing time so far, or the frozen value once stopped.
    pub fn processing_time(&self) -> Duration {
        self.timer
            .lock()
            .ok()
            .and_then(|timer| {
                timer
                    .elapsed
                    .or_else(|| timer.started.map(|started| started.elapsed()))
            })
            .unwrap_or_default()
    }

    /// Point-in-time copy of the counters.
    pub fn snapshot(&self) -> StatisticsSnapshot {
        StatisticsSnapshot {
            processed: self.processed(),
            created: self.created(),
            updated: self.updated(),
            failed: self.failed(),
            processing_time_ms: self.processing_time().as_millis() as u64,
        }
    }

    /// Human-readable summary of the counters.
    pub fn report_message(&self) -> String {
        self.snapshot().to_string()
    }
}

/// Immutable copy of [`SyncStatistics`], returned by a sync call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsSnapshot {
    pub processed: u64,
    pub created: u64,
    pub updated: u64,
    pub failed: u64,
    pub processing_time_ms: u64,
}

impl fmt::Display for StatisticsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Summary: {} inventory entries were processed in total ({} created, {} updated and {} failed to sync).",
            self.processed, self.created, self.updated, self.failed
        )
    }
}
