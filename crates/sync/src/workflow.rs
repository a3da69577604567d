//! The sync workflows the caller triggers.
//!
//! Everything runs strictly in sequence inside one invocation — page
//! fetches, store reads, batch writes — so progress is monotonic and
//! the curation early-stop sees pages in creation order. Concurrent
//! runs against the same sheet are a caller-serialized hazard
//! (last-writer-wins); serialize them upstream.

use podsync_core::{CancelToken, Category, Progress};

use crate::delta;
use crate::duplicates;
use crate::error::SyncError;
use crate::report::{SyncMode, SyncReport};
use crate::store::{RemoteSource, RowStore};
use crate::writer;

/// Full backfill: append every remote record the store has never seen.
///
/// Row order of the existing region is untouched; missing rows land
/// after it. Running twice against an unchanged remote writes nothing
/// the second time.
pub fn backfill<S: RowStore, R: RemoteSource>(
    store: &mut S,
    source: &mut R,
    sheet: &str,
    category: Category,
    progress: &mut Progress,
    cancel: &CancelToken,
) -> Result<SyncReport, SyncError> {
    let remote = source.fetch_all(category, progress, cancel)?;
    let fetched = remote.len();

    let existing = store.read_records(sheet, category, progress)?;
    let existing_len = existing.len();

    let missing = delta::filter_unseen(remote, &existing);
    let new_rows = missing.len();

    let rows_written =
        writer::append_missing(store, sheet, category, &missing, existing_len, progress)?;
    progress.finish();

    Ok(SyncReport {
        category,
        mode: SyncMode::Backfill,
        fetched,
        existing: existing_len,
        new_rows,
        rows_written,
        rows_cleared: 0,
    })
}

/// Incremental sync: prepend new records and rewrite the whole region.
///
/// The delta strategy is fixed per category: episodes and channels
/// compare against the store's maximum integer id; curations compare
/// creation stamps against the store's latest, behind the one-second
/// guard. When the delta is empty no clear and no write is issued.
pub fn incremental<S: RowStore, R: RemoteSource>(
    store: &mut S,
    source: &mut R,
    sheet: &str,
    category: Category,
    progress: &mut Progress,
    cancel: &CancelToken,
) -> Result<SyncReport, SyncError> {
    let existing = store.read_records(sheet, category, progress)?;
    let existing_len = existing.len();

    let (fetched, fresh) = match category {
        Category::Episode | Category::Channel => {
            let remote = source.fetch_all(category, progress, cancel)?;
            let fetched = remote.len();
            let fresh = delta::new_by_max_identity(remote, delta::max_identity(&existing));
            (fetched, fresh)
        }
        Category::Curation => {
            // An empty replica never triggers an implicit full resync;
            // populating from scratch is the backfill workflow's job.
            if existing.is_empty() {
                return Ok(SyncReport::empty(category, SyncMode::Incremental));
            }
            let latest = delta::latest_created_at(&existing);
            let remote = source.fetch_since(category, latest, progress, cancel)?;
            let fetched = remote.len();
            let fresh = delta::new_by_latest_timestamp(remote, latest);
            (fetched, fresh)
        }
    };

    let fresh = delta::filter_unseen(fresh, &existing);
    if fresh.is_empty() {
        return Ok(SyncReport {
            category,
            mode: SyncMode::Incremental,
            fetched,
            existing: existing_len,
            new_rows: 0,
            rows_written: 0,
            rows_cleared: 0,
        });
    }

    let new_rows = fresh.len();
    let merged = delta::merge_prepend(fresh, existing);
    let outcome = writer::overwrite_merged(store, sheet, category, &merged, progress)?;
    progress.finish();

    Ok(SyncReport {
        category,
        mode: SyncMode::Incremental,
        fetched,
        existing: existing_len,
        new_rows,
        rows_written: outcome.rows_written,
        rows_cleared: outcome.rows_cleared,
    })
}

/// Resync episodes whose title is shared by more than one id
/// (re-uploads). The unseen ones are prepended and the region is
/// rewritten, same as an incremental sync.
pub fn resync_duplicates<S: RowStore, R: RemoteSource>(
    store: &mut S,
    source: &mut R,
    sheet: &str,
    progress: &mut Progress,
    cancel: &CancelToken,
) -> Result<SyncReport, SyncError> {
    let category = Category::Episode;

    let remote = source.fetch_all(category, progress, cancel)?;
    let fetched = remote.len();
    let dups = duplicates::duplicate_title_episodes(&remote);

    let existing = store.read_records(sheet, category, progress)?;
    let existing_len = existing.len();

    let fresh = delta::filter_unseen(dups, &existing);
    if fresh.is_empty() {
        return Ok(SyncReport {
            category,
            mode: SyncMode::DuplicateResync,
            fetched,
            existing: existing_len,
            new_rows: 0,
            rows_written: 0,
            rows_cleared: 0,
        });
    }

    let new_rows = fresh.len();
    let merged = delta::merge_prepend(fresh, existing);
    let outcome = writer::overwrite_merged(store, sheet, category, &merged, progress)?;
    progress.finish();

    Ok(SyncReport {
        category,
        mode: SyncMode::DuplicateResync,
        fetched,
        existing: existing_len,
        new_rows,
        rows_written: outcome.rows_written,
        rows_cleared: outcome.rows_cleared,
    })
}
