use std::collections::BTreeMap;

use log::warn;

use super::types::{HeadToHead, MatchRecord, PlayerPair};

/// Builds every head-to-head record from scratch in a single pass
pub fn compute_head_to_head(matches: &[MatchRecord]) -> BTreeMap<PlayerPair, HeadToHead> {
    let mut records: BTreeMap<PlayerPair, HeadToHead> = BTreeMap::new();

    for record in matches {
        if !record.is_well_formed() {
            warn!("Skipping malformed match {} in head-to-head pass", record.id);
            continue;
        }
        let Some(pair) = record.pair() else {
            continue;
        };

        let h2h = records
            .entry(pair)
            .or_insert_with(|| HeadToHead::empty(pair));
        h2h.record(
            record.winner_id == pair.low(),
            record.surface(),
            record.court_type(),
        );
    }

    records
}
