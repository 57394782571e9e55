pub mod elo;
pub mod forecast;
pub mod performance;
pub mod types;

pub use elo::{adaptive_k_factor, expected_outcome, update_rating};
pub use forecast::{Contender, MatchupForecast, forecast};
pub use performance::{performance_rating, tournament_performance_ratings};
pub use types::{MatchOutcome, PlayerId, PlayerRating, RatingValue, TournamentId};
