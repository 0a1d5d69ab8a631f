//! Sync configuration and caller-supplied hooks.

use crate::actions::{ActionBuilder, DefaultActionBuilder};
use crate::error::{SyncError, SyncProblem};
use invsync_types::{InventoryEntry, ResolvedDraft, UpdateAction};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::error;

/// Default number of drafts fetched and dispatched together.
pub const DEFAULT_BATCH_SIZE: usize = 30;

/// Invoked once for every recoverable problem, with the remote error that
/// caused it when there is one.
pub type ErrorCallback = Arc<dyn Fn(&SyncProblem, Option<&SyncError>) + Send + Sync>;

/// May filter or rewrite the actions computed for an update. Returning an
/// empty list suppresses the update call.
pub type BeforeUpdateCallback =
    Arc<dyn Fn(Vec<UpdateAction>, &InventoryEntry, &ResolvedDraft) -> Vec<UpdateAction> + Send + Sync>;

/// May rewrite a draft about to be created. Returning `None` skips creation.
pub type BeforeCreateCallback = Arc<dyn Fn(ResolvedDraft) -> Option<ResolvedDraft> + Send + Sync>;

/// Plain, serializable sync settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SyncConfig {
    /// Drafts per batch. Each batch costs one bulk fetch and up to this many
    /// concurrent create/update calls.
    pub batch_size: usize,
    /// Create supply channels that drafts reference but the store lacks.
    pub ensure_channels: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            ensure_channels: false,
        }
    }
}

/// Settings plus hooks for one [`InventorySync`](crate::InventorySync).
#[derive(Clone)]
pub struct SyncOptions {
    config: SyncConfig,
    error_callback: Option<ErrorCallback>,
    before_update: Option<BeforeUpdateCallback>,
    before_create: Option<BeforeCreateCallback>,
    action_builder: Arc<dyn ActionBuilder>,
}

impl SyncOptions {
    pub fn builder() -> SyncOptionsBuilder {
        SyncOptionsBuilder::default()
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn batch_size(&self) -> usize {
        self.config.batch_size
    }

    pub fn ensure_channels(&self) -> bool {
        self.config.ensure_channels
    }

    pub fn action_builder(&self) -> &dyn ActionBuilder {
        self.action_builder.as_ref()
    }

    /// Logs the problem and hands it to the error callback, if any.
    pub fn apply_error_callback(&self, problem: &SyncProblem, cause: Option<&SyncError>) {
        match cause {
            Some(cause) => error!("{} Cause: {}", problem, cause),
            None => error!("{}", problem),
        }
        if let Some(callback) = &self.error_callback {
            callback(problem, cause);
        }
    }

    pub fn apply_before_update(
        &self,
        actions: Vec<UpdateAction>,
        existing: &InventoryEntry,
        draft: &ResolvedDraft,
    ) -> Vec<UpdateAction> {
        match &self.before_update {
            Some(hook) if !actions.is_empty() => hook(actions, existing, draft),
            _ => actions,
        }
    }

    pub fn apply_before_create(&self, draft: ResolvedDraft) -> Option<ResolvedDraft> {
        match &self.before_create {
            Some(hook) => hook(draft),
            None => Some(draft),
        }
    }
}

impl Default for SyncOptions {
    fn default() -> Self {
        SyncOptionsBuilder::default().build()
    }
}

impl fmt::Debug for SyncOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncOptions")
            .field("config", &self.config)
            .field("error_callback", &self.error_callback.is_some())
            .field("before_update", &self.before_update.is_some())
            .field("before_create", &self.before_create.is_some())
            .finish()
    }
}

/// Builder for [`SyncOptions`].
#[derive(Default)]
pub struct SyncOptionsBuilder {
    config: SyncConfig,
    error_callback: Option<ErrorCallback>,
    before_update: Option<BeforeUpdateCallback>,
    before_create: Option<BeforeCreateCallback>,
    action_builder: Option<Arc<dyn ActionBuilder>>,
}

impl SyncOptionsBuilder {
    /// Starts from an existing config; a zero batch size falls back to the
    /// default.
    pub fn from_config(config: SyncConfig) -> Self {
        Self::default()
            .batch_size(config.batch_size)
            .ensure_channels(config.ensure_channels)
    }

    /// Sets the batch size. Zero is ignored.
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        if batch_size > 0 {
            self.config.batch_size = batch_size;
        }
        self
    }

    pub fn ensure_channels(mut self, ensure: bool) -> Self {
        self.config.ensure_channels = ensure;
        self
    }

    pub fn error_callback(
        mut self,
        callback: impl Fn(&SyncProblem, Option<&SyncError>) + Send + Sync + 'static,
    ) -> Self {
        self.error_callback = Some(Arc::new(callback));
        self
    }

    pub fn before_update(
        mut self,
        hook: impl Fn(Vec<UpdateAction>, &InventoryEntry, &ResolvedDraft) -> Vec<UpdateAction>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.before_update = Some(Arc::new(hook));
        self
    }

    pub fn before_create(
        mut self,
        hook: impl Fn(ResolvedDraft) -> Option<ResolvedDraft> + Send + Sync + 'static,
    ) -> Self {
        self.before_create = Some(Arc::new(hook));
        self
    }

    /// Replaces the default field-by-field diff.
    pub fn action_builder(mut self, builder: impl ActionBuilder + 'static) -> Self {
        self.action_builder = Some(Arc::new(builder));
        self
    }

    pub fn build(self) -> SyncOptions {
        SyncOptions {
            config: self.config,
            error_callback: self.error_callback,
            before_update: self.before_update,
            before_create: self.before_create,
            action_builder: self
                .action_builder
                .unwrap_or_else(|| Arc::new(DefaultActionBuilder) as Arc<dyn ActionBuilder>),
        }
    }
}
