//! Draft validation and batching.

use crate::error::SyncProblem;
use crate::options::SyncOptions;
use crate::statistics::SyncStatistics;
use invsync_types::InventoryEntryDraft;

/// A draft that passed validation, with its sku pulled out.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckedDraft {
    pub sku: String,
    pub draft: InventoryEntryDraft,
}

impl CheckedDraft {
    /// Returns `None` for drafts without a non-empty sku.
    pub fn check(draft: InventoryEntryDraft) -> Option<Self> {
        let sku = draft.valid_sku()?.to_owned();
        Some(Self { sku, draft })
    }

    pub fn channel_key(&self) -> Option<&str> {
        self.draft.channel_key()
    }
}

/// Splits `drafts` into batches of `options.batch_size()`.
///
/// Absent drafts and drafts without a sku are rejected on the spot: the
/// error callback fires, then `processed` and `failed` are incremented.
/// Valid drafts keep their input order; only the last batch may be short,
/// and no batch is empty.
pub fn partition<I>(
    drafts: I,
    options: &SyncOptions,
    statistics: &SyncStatistics,
) -> Vec<Vec<CheckedDraft>>
where
    I: IntoIterator<Item = Option<InventoryEntryDraft>>,
{
    let batch_size = options.batch_size().max(1);
    let mut batches = Vec::new();
    let mut current = Vec::with_capacity(batch_size);

    for draft in drafts {
        let checked = match draft {
            None => Err(SyncProblem::NullDraft),
            Some(draft) => CheckedDraft::check(draft).ok_or(SyncProblem::MissingSku),
        };
        match checked {
            Ok(checked) => {
                current.push(checked);
                if current.len() == batch_size {
                    batches.push(std::mem::replace(
                        &mut current,
                        Vec::with_capacity(batch_size),
                    ));
                }
            }
            Err(problem) => {
                options.apply_error_callback(&problem, None);
                statistics.increment_processed();
                statistics.increment_failed();
            }
        }
    }
    if !current.is_empty() {
        batches.push(current);
    }

    batches
}
