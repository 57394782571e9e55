pub mod aggregator;
pub mod classification;
pub mod head_to_head;
pub mod player_tournament;
pub mod ratings;
pub mod types;

pub use aggregator::{AggregateSnapshot, StatsAggregator};
pub use classification::{CourtType, RatingBucket, Surface};
pub use head_to_head::compute_head_to_head;
pub use player_tournament::compute_player_tournament_stats;
pub use ratings::{compute_initial_ratings, group_matches_by_player};
pub use types::{
    HeadToHead, MatchRecord, PlayerPair, PlayerTournamentKey, PlayerTournamentStats, SplitCounts,
    win_percentage,
};
