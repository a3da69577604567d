//! `podsync-core` — shared types for the spreadsheet sync engine.
//!
//! Pure crate: record variants, positional row layouts, timestamp
//! decoding, and the progress/cancellation/auth-recovery primitives.
//! No HTTP and no file I/O.

pub mod auth;
pub mod cancel;
pub mod codec;
pub mod layout;
pub mod progress;
pub mod record;
pub mod timestamp;

pub use auth::{with_refresh, AuthRecovery};
pub use cancel::CancelToken;
pub use layout::{Layout, HEADER_OFFSET_ROW, MAX_SHEET_ROWS};
pub use progress::Progress;
pub use record::{Category, Channel, CurationEntry, Episode, Identity, Record};
