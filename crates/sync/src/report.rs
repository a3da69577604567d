//! Run reports handed back to the caller.

use serde::Serialize;

use podsync_core::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    Backfill,
    Incremental,
    DuplicateResync,
}

/// Outcome of one sync run.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub category: Category,
    pub mode: SyncMode,
    /// Records fetched from the remote (after degradation, so 0 on a
    /// failed fetch).
    pub fetched: usize,
    /// Records decoded from the store before writing.
    pub existing: usize,
    /// Records classified as new/missing after the identity filter.
    pub new_rows: usize,
    pub rows_written: usize,
    pub rows_cleared: u32,
}

impl SyncReport {
    pub(crate) fn empty(category: Category, mode: SyncMode) -> Self {
        Self {
            category,
            mode,
            fetched: 0,
            existing: 0,
            new_rows: 0,
            rows_written: 0,
            rows_cleared: 0,
        }
    }
}
