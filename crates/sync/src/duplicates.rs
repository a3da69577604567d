//! Duplicate-title discovery.
//!
//! Re-uploaded episodes come back from the remote with a fresh id but
//! the same name. Any name carried by more than one episode marks all
//! of its episodes as the duplicate set; the resync workflow prepends
//! the ones the store has not seen yet.

use std::collections::HashMap;

use podsync_core::Record;

/// Episodes whose name is shared by at least two episodes.
pub fn duplicate_title_episodes(records: &[Record]) -> Vec<Record> {
    let mut by_name: HashMap<&str, u32> = HashMap::new();
    for record in records {
        if let Record::Episode(e) = record {
            *by_name.entry(e.episode_name.as_str()).or_insert(0) += 1;
        }
    }

    records
        .iter()
        .filter(|r| match r {
            Record::Episode(e) => by_name.get(e.episode_name.as_str()).copied().unwrap_or(0) > 1,
            _ => false,
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use podsync_core::Episode;

    fn episode(id: i64, name: &str) -> Record {
        Record::Episode(Episode {
            episode_id: id,
            episode_name: name.into(),
            ..Default::default()
        })
    }

    #[test]
    fn test_finds_shared_titles() {
        let records = vec![
            episode(1, "Pilot"),
            episode(2, "Season Finale"),
            episode(3, "Pilot"),
            episode(4, "Interview"),
        ];
        let dups = duplicate_title_episodes(&records);
        let ids: Vec<_> = dups.iter().filter_map(Record::numeric_id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_unique_titles_yield_nothing() {
        let records = vec![episode(1, "A"), episode(2, "B")];
        assert!(duplicate_title_episodes(&records).is_empty());
    }

    #[test]
    fn test_non_episode_records_ignored() {
        let records = vec![Record::Channel(Default::default())];
        assert!(duplicate_title_episodes(&records).is_empty());
    }
}
