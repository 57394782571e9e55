use std::collections::{BTreeMap, HashMap};

use super::classification::{CourtType, Surface};
use super::types::MatchRecord;
use crate::config::settings::RatingSettings;
use crate::rating::{PlayerId, PlayerRating, RatingValue};

#[derive(Debug, Clone, Copy, Default)]
struct WinTally {
    matches: u32,
    wins: u32,
}

impl WinTally {
    fn add(&mut self, won: bool) {
        self.matches += 1;
        if won {
            self.wins += 1;
        }
    }

    fn rating(&self, settings: &RatingSettings) -> Option<RatingValue> {
        if self.matches == 0 {
            return None;
        }
        let win_rate = f64::from(self.wins) / f64::from(self.matches);
        Some(settings.default_rating + win_rate * settings.win_rate_spread)
    }
}

/// Indexes well-formed matches by each participating player
pub fn group_matches_by_player(matches: &[MatchRecord]) -> HashMap<PlayerId, Vec<&MatchRecord>> {
    let mut grouped: HashMap<PlayerId, Vec<&MatchRecord>> = HashMap::new();
    for record in matches.iter().filter(|m| m.is_well_formed()) {
        grouped.entry(record.player1_id).or_default().push(record);
        grouped.entry(record.player2_id).or_default().push(record);
    }
    grouped
}

/// Win-rate ratings for every player that has played at least once.
///
/// Players without matches are left out so their stored rating stays as it
/// is; the same goes for surface or court buckets without matches.
pub fn compute_initial_ratings(
    players: &[PlayerId],
    matches_by_player: &HashMap<PlayerId, Vec<&MatchRecord>>,
    settings: &RatingSettings,
) -> BTreeMap<PlayerId, PlayerRating> {
    let mut ratings = BTreeMap::new();

    for &player_id in players {
        let Some(matches) = matches_by_player.get(&player_id) else {
            continue;
        };

        let mut overall = WinTally::default();
        let mut surfaces: HashMap<Surface, WinTally> = HashMap::new();
        let mut courts: HashMap<CourtType, WinTally> = HashMap::new();

        for record in matches {
            let won = record.winner_id == player_id;
            overall.add(won);
            if let Some(surface) = record.surface() {
                surfaces.entry(surface).or_default().add(won);
            }
            if let Some(court) = record.court_type() {
                courts.entry(court).or_default().add(won);
            }
        }

        let Some(overall_rating) = overall.rating(settings) else {
            continue;
        };

        let surface_rating = |surface: Surface| surfaces.get(&surface).and_then(|t| t.rating(settings));
        let court_rating = |court: CourtType| courts.get(&court).and_then(|t| t.rating(settings));

        let mut rating = PlayerRating::new(player_id, overall_rating, overall.matches);
        rating.hard_court = surface_rating(Surface::Hard);
        rating.clay_court = surface_rating(Surface::Clay);
        rating.grass_court = surface_rating(Surface::Grass);
        rating.carpet_court = surface_rating(Surface::Carpet);
        rating.indoor = court_rating(CourtType::Indoor);
        rating.outdoor = court_rating(CourtType::Outdoor);

        ratings.insert(player_id, rating);
    }

    ratings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, p1: i64, p2: i64, winner: i64, surface: &str, court: &str) -> MatchRecord {
        MatchRecord {
            id,
            tournament_id: 1,
            player1_id: p1,
            player2_id: p2,
            winner_id: winner,
            surface: Some(surface.to_string()),
            court: Some(court.to_string()),
        }
    }

    fn fixture() -> Vec<MatchRecord> {
        vec![
            record(1, 1, 2, 1, "Hard", "Outdoor"),
            record(2, 1, 2, 2, "Clay", "Outdoor"),
            record(3, 1, 3, 1, "Hard", "Indoor"),
            record(4, 2, 3, 2, "Grass", "Outdoor"),
        ]
    }

    #[test]
    fn test_win_rate_ratings() {
        let matches = fixture();
        let grouped = group_matches_by_player(&matches);
        let ratings = compute_initial_ratings(&[1, 2, 3], &grouped, &RatingSettings::default());

        let p1 = &ratings[&1];
        // 2 wins out of 3
        assert!((p1.overall - (1500.0 + 500.0 * 2.0 / 3.0)).abs() < 1e-9);
        assert_eq!(p1.hard_court, Some(2000.0));
        assert_eq!(p1.clay_court, Some(1500.0));
        assert_eq!(p1.grass_court, None);
        assert_eq!(p1.carpet_court, None);
        assert_eq!(p1.indoor, Some(2000.0));
        assert_eq!(p1.outdoor, Some(1750.0));
        assert_eq!(p1.matches_played, 3);

        let p3 = &ratings[&3];
        assert_eq!(p3.overall, 1500.0);
        assert_eq!(p3.grass_court, Some(1500.0));
    }

    #[test]
    fn test_player_without_matches_is_skipped() {
        let matches = fixture();
        let grouped = group_matches_by_player(&matches);
        let ratings = compute_initial_ratings(&[1, 2, 3, 42], &grouped, &RatingSettings::default());

        assert_eq!(ratings.len(), 3);
        assert!(!ratings.contains_key(&42));
    }

    #[test]
    fn test_recomputation_is_idempotent() {
        let matches = fixture();
        let settings = RatingSettings::default();

        let first = compute_initial_ratings(&[1, 2, 3], &group_matches_by_player(&matches), &settings);
        let second = compute_initial_ratings(&[1, 2, 3], &group_matches_by_player(&matches), &settings);

        assert_eq!(first, second);
    }

    #[test]
    fn test_only_listed_players_are_rated() {
        let matches = fixture();
        let grouped = group_matches_by_player(&matches);
        let ratings = compute_initial_ratings(&[2], &grouped, &RatingSettings::default());

        assert_eq!(ratings.keys().copied().collect::<Vec<_>>(), vec![2]);
        assert!((ratings[&2].overall - (1500.0 + 500.0 * 2.0 / 3.0)).abs() < 1e-9);
    }
}
