//! `podsync-sync` — the reconciliation engine.
//!
//! Computes the delta between the remote dataset and the spreadsheet
//! replica and writes it back, either appending missing rows (backfill)
//! or rewriting the whole region (incremental sync). I/O goes through
//! the [`RowStore`] / [`RemoteSource`] seams so the engine itself is
//! testable against in-memory fakes; the production clients plug in via
//! the `adapters` module.

pub mod adapters;
pub mod delta;
pub mod duplicates;
pub mod error;
pub mod report;
pub mod store;
pub mod workflow;
pub mod writer;

pub use error::SyncError;
pub use report::{SyncMode, SyncReport};
pub use store::{RemoteSource, RowStore};
pub use workflow::{backfill, incremental, resync_duplicates};
