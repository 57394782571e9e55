//! Elo rating primitives.
//!
//! Everything here is a pure function of its inputs.

use super::types::{MatchOutcome, RatingValue};
use crate::config::settings::KFactorSchedule;

/// Probability that a player rated `rating_a` beats one rated `rating_b`
pub fn expected_outcome(rating_a: RatingValue, rating_b: RatingValue) -> f64 {
    1.0 / (1.0 + 10.0_f64.powf((rating_b - rating_a) / 400.0))
}

/// New rating for player A after playing B with the given result
pub fn update_rating(
    rating_a: RatingValue,
    rating_b: RatingValue,
    result: MatchOutcome,
    k_factor: f64,
) -> RatingValue {
    let expected = expected_outcome(rating_a, rating_b);
    rating_a + k_factor * (result.score() - expected)
}

/// K-factor from the default schedule
pub fn adaptive_k_factor(rating: RatingValue, matches_played: u32) -> f64 {
    KFactorSchedule::default().k_factor(rating, matches_played)
}

impl KFactorSchedule {
    /// New players swing hardest regardless of rating; after that the
    /// K-factor shrinks as the rating climbs through the brackets.
    pub fn k_factor(&self, rating: RatingValue, matches_played: u32) -> f64 {
        if matches_played < self.provisional_matches {
            self.provisional_k
        } else if rating < self.intermediate_ceiling {
            self.intermediate_k
        } else if rating < self.advanced_ceiling {
            self.advanced_k
        } else {
            self.elite_k
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_equal_ratings_expect_even_outcome() {
        for rating in [0.0, 1200.0, 1500.0, 2850.5] {
            assert!((expected_outcome(rating, rating) - 0.5).abs() < EPS);
        }
    }

    #[test]
    fn test_expected_outcome_is_symmetric() {
        let pairs = [(1500.0, 1700.0), (2400.0, 1100.0), (1800.0, 1800.5), (0.0, 3000.0)];
        for (a, b) in pairs {
            let sum = expected_outcome(a, b) + expected_outcome(b, a);
            assert!((sum - 1.0).abs() < EPS, "a={a} b={b} sum={sum}");
        }
    }

    #[test]
    fn test_expected_outcome_favours_higher_rating() {
        let p = expected_outcome(1900.0, 1500.0);
        assert!(p > 0.9 && p < 1.0);
        // 400 points is ten-to-one odds
        assert!((p - 10.0 / 11.0).abs() < EPS);
    }

    #[test]
    fn test_win_against_equal_opponent_gains_half_k() {
        let rating = update_rating(1500.0, 1500.0, MatchOutcome::Win, 32.0);
        assert!((rating - 1516.0).abs() < EPS);
    }

    #[test]
    fn test_loss_and_draw_updates() {
        let loss = update_rating(1500.0, 1500.0, MatchOutcome::Loss, 32.0);
        assert!((loss - 1484.0).abs() < EPS);

        let draw = update_rating(1500.0, 1500.0, MatchOutcome::Draw, 32.0);
        assert!((draw - 1500.0).abs() < EPS);
    }

    #[test]
    fn test_new_player_rule_dominates_rating_bracket() {
        assert_eq!(adaptive_k_factor(2500.0, 5), 40.0);
        assert_eq!(adaptive_k_factor(1000.0, 29), 40.0);
    }

    #[test]
    fn test_k_factor_brackets() {
        assert_eq!(adaptive_k_factor(2000.0, 30), 32.0);
        assert_eq!(adaptive_k_factor(2200.0, 100), 24.0);
        assert_eq!(adaptive_k_factor(2100.0, 100), 24.0);
        assert_eq!(adaptive_k_factor(2400.0, 100), 16.0);
        assert_eq!(adaptive_k_factor(2700.0, 500), 16.0);
    }
}
