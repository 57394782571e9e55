use std::collections::BTreeMap;

use log::{info, warn};

use super::head_to_head::compute_head_to_head;
use super::player_tournament::compute_player_tournament_stats;
use super::ratings::{compute_initial_ratings, group_matches_by_player};
use super::types::{HeadToHead, MatchRecord, PlayerPair, PlayerTournamentKey, PlayerTournamentStats};
use crate::config::settings::RatingSettings;
use crate::rating::{PlayerId, PlayerRating, tournament_performance_ratings};

/// Everything derived from one pass over the match set
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateSnapshot {
    pub head_to_head: BTreeMap<PlayerPair, HeadToHead>,
    pub player_tournament: BTreeMap<PlayerTournamentKey, PlayerTournamentStats>,
    pub ratings: BTreeMap<PlayerId, PlayerRating>,
    pub matches_processed: usize,
    pub matches_skipped: usize,
}

/// Recomputes all derived statistics in memory. Owns no storage; callers
/// flush the snapshot themselves.
pub struct StatsAggregator<'a> {
    settings: &'a RatingSettings,
}

impl<'a> StatsAggregator<'a> {
    pub fn new(settings: &'a RatingSettings) -> Self {
        Self { settings }
    }

    pub fn run(&self, players: &[PlayerId], matches: &[MatchRecord]) -> AggregateSnapshot {
        let matches_skipped = matches.iter().filter(|m| !m.is_well_formed()).count();
        if matches_skipped > 0 {
            warn!("{} malformed matches will be ignored", matches_skipped);
        }

        let head_to_head = compute_head_to_head(matches);
        info!("  → {} head-to-head records", head_to_head.len());

        let mut player_tournament =
            compute_player_tournament_stats(matches, self.settings.default_rating);
        info!("  → {} player-tournament records", player_tournament.len());

        let grouped = group_matches_by_player(matches);
        let ratings = compute_initial_ratings(players, &grouped, self.settings);
        info!("  → {} player ratings", ratings.len());

        let performances =
            tournament_performance_ratings(matches, &ratings, self.settings.default_rating);
        for (key, performance) in performances {
            if let Some(stats) = player_tournament.get_mut(&key) {
                stats.elo_rating = performance;
            }
        }

        AggregateSnapshot {
            head_to_head,
            player_tournament,
            ratings,
            matches_processed: matches.len() - matches_skipped,
            matches_skipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, tournament_id: i64, p1: i64, p2: i64, winner: i64) -> MatchRecord {
        MatchRecord {
            id,
            tournament_id,
            player1_id: p1,
            player2_id: p2,
            winner_id: winner,
            surface: Some("Hard".to_string()),
            court: Some("Indoor".to_string()),
        }
    }

    #[test]
    fn test_snapshot_covers_all_aggregates() {
        let settings = RatingSettings::default();
        let matches = vec![
            record(1, 1, 1, 2, 1),
            record(2, 1, 2, 3, 3),
            record(3, 2, 1, 3, 1),
            record(4, 2, 4, 4, 4),
        ];

        let snapshot = StatsAggregator::new(&settings).run(&[1, 2, 3, 4], &matches);

        assert_eq!(snapshot.matches_processed, 3);
        assert_eq!(snapshot.matches_skipped, 1);
        assert_eq!(snapshot.head_to_head.len(), 3);
        assert_eq!(snapshot.ratings.len(), 3);
        assert!(!snapshot.ratings.contains_key(&4));
        assert_eq!(snapshot.ratings[&1].overall, 2000.0);

        // player 1 beat the winless player 2 in tournament 1
        let p1_t1 = &snapshot.player_tournament[&PlayerTournamentKey::new(1, 1)];
        assert_eq!(p1_t1.elo_rating, 1500.0 + 400.0);
        // player 3 lost to the unbeaten player 1 in tournament 2
        let p3_t2 = &snapshot.player_tournament[&PlayerTournamentKey::new(3, 2)];
        assert_eq!(p3_t2.elo_rating, 2000.0 - 400.0);
    }

    #[test]
    fn test_running_twice_gives_identical_snapshots() {
        let settings = RatingSettings::default();
        let matches = vec![record(1, 1, 1, 2, 2), record(2, 1, 1, 2, 1), record(3, 2, 3, 1, 3)];
        let aggregator = StatsAggregator::new(&settings);

        assert_eq!(aggregator.run(&[1, 2, 3], &matches), aggregator.run(&[1, 2, 3], &matches));
    }

    #[test]
    fn test_empty_match_set() {
        let settings = RatingSettings::default();
        let snapshot = StatsAggregator::new(&settings).run(&[1, 2], &[]);

        assert!(snapshot.head_to_head.is_empty());
        assert!(snapshot.player_tournament.is_empty());
        assert!(snapshot.ratings.is_empty());
        assert_eq!(snapshot.matches_processed, 0);
    }
}
