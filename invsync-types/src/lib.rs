//! Core type definitions for invsync.
//!
//! This crate defines the data model shared by the sync engine and its
//! callers:
//! - Store-assigned identifiers (UUID v7)
//! - Inventory entry drafts (desired state) and stored inventory entries
//! - Supply channels and the references drafts use to point at them
//! - Update actions applied to existing entries

mod action;
mod channel;
mod ids;
mod inventory;

pub use action::UpdateAction;
pub use channel::{Channel, ChannelReference, ChannelRole};
pub use ids::{ChannelId, EntryId};
pub use inventory::{CustomFields, InventoryEntry, InventoryEntryDraft, ResolvedDraft};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),
}

/// Parses a JSON array of drafts. `null` elements are kept as `None` so the
/// engine can report them instead of silently dropping them.
pub fn parse_drafts(json: &str) -> Result<Vec<Option<InventoryEntryDraft>>> {
    Ok(serde_json::from_str(json)?)
}
