use serde::{Deserialize, Serialize};

pub type PlayerId = i64;
pub type TournamentId = i64;
pub type RatingValue = f64;

/// Result of a single match from one player's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    Loss,
    Draw,
    Win,
}

impl MatchOutcome {
    pub fn score(self) -> f64 {
        match self {
            MatchOutcome::Loss => 0.0,
            MatchOutcome::Draw => 0.5,
            MatchOutcome::Win => 1.0,
        }
    }
}

/// Derived ratings for one player.
///
/// Bucket ratings are `None` when the player has no match in that bucket,
/// in which case whatever is stored keeps its value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRating {
    pub player_id: PlayerId,
    pub overall: RatingValue,
    pub hard_court: Option<RatingValue>,
    pub clay_court: Option<RatingValue>,
    pub grass_court: Option<RatingValue>,
    pub carpet_court: Option<RatingValue>,
    pub indoor: Option<RatingValue>,
    pub outdoor: Option<RatingValue>,
    pub matches_played: u32,
}

impl PlayerRating {
    pub fn new(player_id: PlayerId, overall: RatingValue, matches_played: u32) -> Self {
        Self {
            player_id,
            overall,
            hard_court: None,
            clay_court: None,
            grass_court: None,
            carpet_court: None,
            indoor: None,
            outdoor: None,
            matches_played,
        }
    }
}
