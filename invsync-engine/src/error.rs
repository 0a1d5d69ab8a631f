//! Error types for the sync layer.
//!
//! Two families live here. [`SyncError`] is what the remote store reports
//! when a single call fails. [`SyncProblem`] classifies the recoverable
//! failures the engine hands to the error callback; none of them escape a
//! sync call.

use thiserror::Error;

/// Result type for remote store operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors returned by an [`InventoryService`](crate::InventoryService).
#[derive(Debug, Error)]
pub enum SyncError {
    /// Transport or server-side failure.
    #[error("remote error: {0}")]
    Remote(String),

    /// The addressed resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A resource with the same identity already exists, or an optimistic
    /// version check failed.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The store rejected the payload.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A recoverable problem met while syncing, reported through the error
/// callback. The `Display` output is the message handed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncProblem {
    #[error("Failed to process null inventory draft.")]
    NullDraft,

    #[error("Failed to process inventory entry without sku.")]
    MissingSku,

    /// Bootstrap fetch of the channel registry failed; the call is aborted.
    #[error("Failed to fetch supply channels.")]
    ChannelFetchFailed,

    #[error("Failed to create new supply channel of key '{key}'.")]
    ChannelCreateFailed { key: String },

    /// A batch's bulk fetch failed; that batch is abandoned.
    #[error("Failed to fetch existing inventory entries of SKUs {}.", format_skus(.skus))]
    EntryFetchFailed { skus: Vec<String> },

    #[error("Failed to find supply channel of key '{key}'.")]
    ChannelKeyNotFound { key: String },

    #[error(
        "Failed to create inventory entry of sku '{sku}' and supply channel key '{}'.",
        display_key(.channel_key)
    )]
    CreateFailed {
        sku: String,
        channel_key: Option<String>,
    },

    #[error(
        "Failed to update inventory entry of sku '{sku}' and supply channel key '{}'.",
        display_key(.channel_key)
    )]
    UpdateFailed {
        sku: String,
        channel_key: Option<String>,
    },
}

impl SyncProblem {
    /// Whether this problem aborts the whole sync call.
    pub fn is_call_fatal(&self) -> bool {
        matches!(self, Self::ChannelFetchFailed)
    }
}

fn format_skus(skus: &[String]) -> String {
    format!("[{}]", skus.join(", "))
}

fn display_key(key: &Option<String>) -> &str {
    key.as_deref().unwrap_or("null")
}
