//! Seams between the engine and its two I/O collaborators.
//!
//! The sheet name is threaded through every store call explicitly; the
//! engine never reads ambient configuration.

use chrono::{DateTime, Utc};

use podsync_core::{CancelToken, Category, Progress, Record};

use crate::error::SyncError;

/// The spreadsheet region acting as durable replica storage.
pub trait RowStore {
    /// Last occupied row index, discovered by scanning the sentinel
    /// column, floored at the header-offset row.
    fn last_occupied_row(&mut self, sheet: &str) -> Result<u32, SyncError>;

    /// Decode the full occupied region. Rows with an empty identity
    /// cell are dropped, not errors.
    fn read_records(
        &mut self,
        sheet: &str,
        category: Category,
        progress: &mut Progress,
    ) -> Result<Vec<Record>, SyncError>;

    /// Write records starting at `start_row` (absolute, 1-based).
    /// Returns the number of rows written.
    fn write_records(
        &mut self,
        sheet: &str,
        category: Category,
        start_row: u32,
        records: &[Record],
        progress: &mut Progress,
    ) -> Result<usize, SyncError>;

    /// Blank the variant's column span over `start_row..=end_row`.
    fn clear_range(
        &mut self,
        sheet: &str,
        category: Category,
        start_row: u32,
        end_row: u32,
    ) -> Result<(), SyncError>;
}

/// The paginated remote dataset.
pub trait RemoteSource {
    /// Fetch the entire dataset. Non-auth failures yield an empty set.
    fn fetch_all(
        &mut self,
        category: Category,
        progress: &mut Progress,
        cancel: &CancelToken,
    ) -> Result<Vec<Record>, SyncError>;

    /// Fetch the tail newer than `latest` (a bound of `None` means
    /// unbounded). May return more than the tail — callers filter.
    fn fetch_since(
        &mut self,
        category: Category,
        latest: Option<DateTime<Utc>>,
        progress: &mut Progress,
        cancel: &CancelToken,
    ) -> Result<Vec<Record>, SyncError>;
}
