//! Identity & delta calculation.
//!
//! Two strategies, fixed per category:
//!
//! - **Max-identity** (episodes, channels): identities are integers
//!   assigned monotonically at creation, so anything above the store's
//!   maximum is new.
//! - **Latest-timestamp** (curations): identities are creation stamps.
//!   Anything decoding later than the store's latest stamp plus a one
//!   second guard is new; the guard tolerates clock and serial-rounding
//!   skew right at the boundary.
//!
//! Both strategies are followed by the identity-set filter, which is
//! what actually upholds the uniqueness invariant — the strategies only
//! bound how much of the remote set is considered.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};

use podsync_core::{timestamp, Identity, Record};

/// Skew guard for the latest-timestamp strategy.
pub const TIMESTAMP_GUARD_MS: i64 = 1_000;

/// Largest integer identity in the store, 0 when empty.
pub fn max_identity(existing: &[Record]) -> i64 {
    existing.iter().filter_map(Record::numeric_id).max().unwrap_or(0)
}

/// Latest decodable creation stamp in the store.
pub fn latest_created_at(existing: &[Record]) -> Option<DateTime<Utc>> {
    existing
        .iter()
        .filter_map(|r| timestamp::decode(r.created_at()))
        .max()
}

/// Max-identity strategy: keep remote records with an id above `max_id`.
pub fn new_by_max_identity(remote: Vec<Record>, max_id: i64) -> Vec<Record> {
    remote
        .into_iter()
        .filter(|r| r.numeric_id().map_or(false, |id| id > max_id))
        .collect()
}

/// Latest-timestamp strategy: keep remote records whose creation stamp
/// decodes strictly later than `latest` plus the skew guard.
///
/// A `latest` of `None` means the store was empty; the strategy then
/// short-circuits to "nothing new" rather than "everything is new" — an
/// empty replica must never trigger an implicit full resync. Full
/// population is the backfill workflow's job.
pub fn new_by_latest_timestamp(
    remote: Vec<Record>,
    latest: Option<DateTime<Utc>>,
) -> Vec<Record> {
    let Some(latest) = latest else {
        return Vec::new();
    };
    let cutoff = latest + Duration::milliseconds(TIMESTAMP_GUARD_MS);

    remote
        .into_iter()
        .filter(|r| timestamp::decode(r.created_at()).map_or(false, |t| t > cutoff))
        .collect()
}

/// Identity-set filter: drop candidates whose identity already exists
/// in the store.
pub fn filter_unseen(candidates: Vec<Record>, existing: &[Record]) -> Vec<Record> {
    let seen: HashSet<Identity> = existing.iter().map(Record::identity).collect();
    let mut kept = Vec::new();
    let mut added: HashSet<Identity> = HashSet::new();

    for record in candidates {
        let id = record.identity();
        if seen.contains(&id) || !added.insert(id) {
            continue;
        }
        kept.push(record);
    }
    kept
}

/// Merge order for incremental sync: new rows first, then the existing
/// store. Newest-first, and not stable across repeated syncs unless no
/// new data arrives.
pub fn merge_prepend(new: Vec<Record>, existing: Vec<Record>) -> Vec<Record> {
    let mut merged = new;
    merged.extend(existing);
    merged
}
