//! `podsync-sheets` — workbook API client backing the row store.
//!
//! Blocking reqwest client (no Tokio runtime required). Speaks the
//! workbook range protocol: batched rectangular reads, batched writes,
//! range clears, worksheet listing, and bearer-token refresh.

pub mod auth;
pub mod client;
pub mod error;

pub use auth::SheetsCredentials;
pub use client::SheetsClient;
pub use error::SheetsError;
