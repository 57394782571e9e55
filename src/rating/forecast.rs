use serde::Serialize;

use super::elo::{expected_outcome, update_rating};
use super::types::{MatchOutcome, RatingValue};
use crate::config::settings::KFactorSchedule;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contender {
    pub rating: RatingValue,
    pub matches_played: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContenderOutlook {
    pub rating: RatingValue,
    pub win_probability: f64,
    pub k_factor: f64,
    pub rating_if_win: RatingValue,
    pub rating_if_loss: RatingValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchupForecast {
    pub player1: ContenderOutlook,
    pub player2: ContenderOutlook,
}

pub fn forecast(a: Contender, b: Contender, schedule: &KFactorSchedule) -> MatchupForecast {
    MatchupForecast {
        player1: outlook(a, b, schedule),
        player2: outlook(b, a, schedule),
    }
}

fn outlook(me: Contender, opponent: Contender, schedule: &KFactorSchedule) -> ContenderOutlook {
    let k_factor = schedule.k_factor(me.rating, me.matches_played);
    ContenderOutlook {
        rating: me.rating,
        win_probability: expected_outcome(me.rating, opponent.rating),
        k_factor,
        rating_if_win: update_rating(me.rating, opponent.rating, MatchOutcome::Win, k_factor),
        rating_if_loss: update_rating(me.rating, opponent.rating, MatchOutcome::Loss, k_factor),
    }
}
