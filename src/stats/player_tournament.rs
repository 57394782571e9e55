use std::collections::BTreeMap;

use log::warn;

use super::types::{MatchRecord, PlayerTournamentKey, PlayerTournamentStats};

/// Appearances, wins and losses for every player in every tournament,
/// derived only from the match set. Performance ratings are left at
/// `default_rating`.
pub fn compute_player_tournament_stats(
    matches: &[MatchRecord],
    default_rating: f64,
) -> BTreeMap<PlayerTournamentKey, PlayerTournamentStats> {
    let mut stats: BTreeMap<PlayerTournamentKey, PlayerTournamentStats> = BTreeMap::new();

    for record in matches {
        if !record.is_well_formed() {
            warn!("Skipping malformed match {} in player-tournament pass", record.id);
            continue;
        }

        let surface = record.surface();
        let court = record.court_type();

        for player_id in [record.player1_id, record.player2_id] {
            let key = PlayerTournamentKey::new(player_id, record.tournament_id);
            let entry = stats
                .entry(key)
                .or_insert_with(|| PlayerTournamentStats::empty(key, default_rating));

            entry.appearances += 1;
            if record.winner_id == player_id {
                entry.record_win(surface, court);
            } else {
                entry.losses += 1;
            }
        }
    }

    stats
}
