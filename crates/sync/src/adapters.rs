//! Production implementations of the engine's I/O seams.

use chrono::{DateTime, Utc};

use podsync_core::{CancelToken, Category, Progress, Record};
use podsync_remote::RemoteClient;
use podsync_sheets::SheetsClient;

use crate::error::SyncError;
use crate::store::{RemoteSource, RowStore};

impl RowStore for SheetsClient {
    fn last_occupied_row(&mut self, sheet: &str) -> Result<u32, SyncError> {
        Ok(SheetsClient::last_occupied_row(self, sheet)?)
    }

    fn read_records(
        &mut self,
        sheet: &str,
        category: Category,
        progress: &mut Progress,
    ) -> Result<Vec<Record>, SyncError> {
        Ok(SheetsClient::read_records(self, sheet, category, progress)?)
    }

    fn write_records(
        &mut self,
        sheet: &str,
        category: Category,
        start_row: u32,
        records: &[Record],
        progress: &mut Progress,
    ) -> Result<usize, SyncError> {
        Ok(SheetsClient::write_records(
            self, sheet, category, start_row, records, progress,
        )?)
    }

    fn clear_range(
        &mut self,
        sheet: &str,
        category: Category,
        start_row: u32,
        end_row: u32,
    ) -> Result<(), SyncError> {
        Ok(SheetsClient::clear_range(self, sheet, category, start_row, end_row)?)
    }
}

impl RemoteSource for RemoteClient {
    fn fetch_all(
        &mut self,
        category: Category,
        progress: &mut Progress,
        cancel: &CancelToken,
    ) -> Result<Vec<Record>, SyncError> {
        Ok(RemoteClient::fetch_all(self, category, progress, cancel)?)
    }

    fn fetch_since(
        &mut self,
        category: Category,
        latest: Option<DateTime<Utc>>,
        progress: &mut Progress,
        cancel: &CancelToken,
    ) -> Result<Vec<Record>, SyncError> {
        Ok(RemoteClient::fetch_since(self, category, latest, progress, cancel)?)
    }
}
