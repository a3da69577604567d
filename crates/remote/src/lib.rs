//! `podsync-remote` — admin API client for the remote dataset.
//!
//! Blocking reqwest client (no Tokio runtime required). Drives the
//! paginated list endpoints sequentially, expands curation details, and
//! recovers from token expiry with a single refresh-and-retry.

pub mod auth;
pub mod client;
pub mod error;

pub use auth::AdminCredentials;
pub use client::RemoteClient;
pub use error::RemoteError;
