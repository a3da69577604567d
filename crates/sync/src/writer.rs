//! The two write modes against the row store.
//!
//! Neither mode is transactional across batches: a failure partway
//! leaves already-written rows committed and the rest absent until the
//! next run rediscovers them as missing (at-least-once semantics).

use podsync_core::{Category, Progress, Record, HEADER_OFFSET_ROW};

use crate::error::SyncError;
use crate::store::RowStore;

/// What an overwrite did, for the run report.
#[derive(Debug, Clone, Copy)]
pub struct OverwriteOutcome {
    pub rows_cleared: u32,
    pub rows_written: usize,
}

/// Append mode: write `missing` records after the occupied region.
///
/// Nothing is cleared first. Idempotent: with an unchanged remote
/// snapshot the missing set is empty and no write is issued.
pub fn append_missing<S: RowStore>(
    store: &mut S,
    sheet: &str,
    category: Category,
    missing: &[Record],
    existing_len: usize,
    progress: &mut Progress,
) -> Result<usize, SyncError> {
    if missing.is_empty() {
        return Ok(0);
    }
    let start_row = existing_len as u32 + HEADER_OFFSET_ROW;
    store.write_records(sheet, category, start_row, missing, progress)
}

/// Overwrite mode: clear-then-write the full merged collection.
///
/// Clears `max(merged_len + header_offset, previous_occupied)` rows so
/// that a shrinking dataset never leaves a stale tail, then writes the
/// merged set from the header-offset row.
pub fn overwrite_merged<S: RowStore>(
    store: &mut S,
    sheet: &str,
    category: Category,
    merged: &[Record],
    progress: &mut Progress,
) -> Result<OverwriteOutcome, SyncError> {
    let previous = store.last_occupied_row(sheet)?;
    let end_row = (merged.len() as u32 + HEADER_OFFSET_ROW).max(previous);

    store.clear_range(sheet, category, HEADER_OFFSET_ROW, end_row)?;
    let rows_written = store.write_records(sheet, category, HEADER_OFFSET_ROW, merged, progress)?;

    Ok(OverwriteOutcome {
        rows_cleared: end_row - HEADER_OFFSET_ROW + 1,
        rows_written,
    })
}
