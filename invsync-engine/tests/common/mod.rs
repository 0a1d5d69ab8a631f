//! Shared test helpers for engine tests.

#![allow(dead_code)]

use invsync_engine::{InMemoryInventoryService, InventorySync, SyncOptionsBuilder, SyncProblem};
use std::sync::{Arc, Mutex};

/// Collects every problem handed to the error callback, with the rendered
/// cause if one was given.
#[derive(Clone, Default)]
pub struct ProblemLog {
    inner: Arc<Mutex<Vec<(SyncProblem, Option<String>)>>>,
}

impl ProblemLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs this log as the builder's error callback.
    pub fn attach(&self, builder: SyncOptionsBuilder) -> SyncOptionsBuilder {
        let inner = self.inner.clone();
        builder.error_callback(move |problem, cause| {
            inner
                .lock()
                .unwrap()
                .push((problem.clone(), cause.map(ToString::to_string)));
        })
    }

    pub fn problems(&self) -> Vec<SyncProblem> {
        self.inner.lock().unwrap().iter().map(|(p, _)| p.clone()).collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.problems().iter().map(ToString::to_string).collect()
    }

    pub fn causes(&self) -> Vec<Option<String>> {
        self.inner.lock().unwrap().iter().map(|(_, c)| c.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }
}

/// Builds a sync over `store` with the given batch size and channel policy,
/// recording problems into the returned log.
pub fn make_sync(
    store: &Arc<InMemoryInventoryService>,
    batch_size: usize,
    ensure_channels: bool,
) -> (InventorySync, ProblemLog) {
    let log = ProblemLog::new();
    let options = log
        .attach(
            SyncOptionsBuilder::default()
                .batch_size(batch_size)
                .ensure_channels(ensure_channels),
        )
        .build();
    (InventorySync::new(store.clone(), options), log)
}

/// Counters of a snapshot as (processed, created, updated, failed).
pub fn counts(stats: &invsync_engine::StatisticsSnapshot) -> (u64, u64, u64, u64) {
    (stats.processed, stats.created, stats.updated, stats.failed)
}

/// Routes engine logs to the test writer; safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("invsync_engine=debug")
        .with_test_writer()
        .try_init();
}
