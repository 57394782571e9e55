use std::collections::BTreeMap;

use super::types::{PlayerId, PlayerRating, RatingValue};
use crate::stats::{MatchRecord, PlayerTournamentKey};

/// Rating implied by a set of results: the average opponent rating moved
/// by up to 400 points towards the win percentage.
pub fn performance_rating(
    opponent_ratings: &[RatingValue],
    wins: u32,
    default_rating: RatingValue,
) -> RatingValue {
    if opponent_ratings.is_empty() {
        return default_rating;
    }

    let games = opponent_ratings.len() as f64;
    let average_opponent = opponent_ratings.iter().sum::<f64>() / games;
    let win_pct = f64::from(wins) / games;
    average_opponent + 400.0 * (2.0 * win_pct - 1.0)
}

#[derive(Default)]
struct Tally {
    opponent_ratings: Vec<RatingValue>,
    wins: u32,
}

/// Performance rating of every player in every tournament they played,
/// measured against the opponents' overall ratings.
pub fn tournament_performance_ratings(
    matches: &[MatchRecord],
    ratings: &BTreeMap<PlayerId, PlayerRating>,
    default_rating: RatingValue,
) -> BTreeMap<PlayerTournamentKey, RatingValue> {
    let overall = |player_id: PlayerId| {
        ratings
            .get(&player_id)
            .map(|r| r.overall)
            .unwrap_or(default_rating)
    };

    let mut tallies: BTreeMap<PlayerTournamentKey, Tally> = BTreeMap::new();
    for record in matches.iter().filter(|m| m.is_well_formed()) {
        for (player_id, opponent_id) in [
            (record.player1_id, record.player2_id),
            (record.player2_id, record.player1_id),
        ] {
            let tally = tallies
                .entry(PlayerTournamentKey::new(player_id, record.tournament_id))
                .or_default();
            tally.opponent_ratings.push(overall(opponent_id));
            if record.winner_id == player_id {
                tally.wins += 1;
            }
        }
    }

    tallies
        .into_iter()
        .map(|(key, tally)| {
            let rating = performance_rating(&tally.opponent_ratings, tally.wins, default_rating);
            (key, rating)
        })
        .collect()
}
