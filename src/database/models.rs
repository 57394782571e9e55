use chrono::{NaiveDate, NaiveDateTime};

use crate::rating::{PlayerId, TournamentId};
use crate::stats::{CourtType, HeadToHead, PlayerTournamentStats, RatingBucket, Surface};

#[derive(Debug, Clone)]
pub struct Sport {
    pub id: i64,
    pub name: String,
    pub category: String,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub ranking: Option<i64>,
    pub country: Option<String>,
    pub titles: i64,
    pub grand_slams: i64,
    pub hand: Option<String>,
    pub img_url: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub series: Option<String>,
    pub court: Option<String>,
    pub surface: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
    pub prize: Option<String>,
    pub img_url: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default)]
pub struct NewTournament<'a> {
    pub name: &'a str,
    pub series: Option<&'a str>,
    pub court: Option<&'a str>,
    pub surface: Option<&'a str>,
}

/// A match joined with its tournament and player names
#[derive(Debug, Clone)]
pub struct Match {
    pub id: i64,
    pub tournament_id: TournamentId,
    pub tournament_name: String,
    pub surface: Option<String>,
    pub court: Option<String>,
    pub date: NaiveDate,
    pub round: Option<String>,
    pub best_of: Option<i64>,
    pub player1_id: PlayerId,
    pub player1_name: String,
    pub player2_id: PlayerId,
    pub player2_name: String,
    pub winner_id: PlayerId,
    pub winner_name: String,
    pub score: Option<String>,
}

impl Match {
    pub fn opponent_of(&self, player_id: PlayerId) -> (PlayerId, &str) {
        if self.player1_id == player_id {
            (self.player2_id, &self.player2_name)
        } else {
            (self.player1_id, &self.player1_name)
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewMatch {
    pub tournament_id: TournamentId,
    pub date: NaiveDate,
    pub round: Option<String>,
    pub best_of: Option<i64>,
    pub player1_id: PlayerId,
    pub player2_id: PlayerId,
    pub winner_id: PlayerId,
    pub rank1: Option<i64>,
    pub rank2: Option<i64>,
    pub pts1: Option<i64>,
    pub pts2: Option<i64>,
    pub odd1: Option<f64>,
    pub odd2: Option<f64>,
    pub score: Option<String>,
}

/// Stored rating row; every bucket holds a value once the row exists
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRating {
    pub player_id: PlayerId,
    pub player_name: String,
    pub elo_rating: f64,
    pub hard_court_elo: f64,
    pub clay_court_elo: f64,
    pub grass_court_elo: f64,
    pub carpet_court_elo: f64,
    pub indoor_elo: f64,
    pub outdoor_elo: f64,
    pub matches_played: u32,
    pub active: bool,
    pub last_updated: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct PlayerTournamentRow {
    pub player_name: String,
    pub tournament_name: String,
    pub stats: PlayerTournamentStats,
}

#[derive(Debug, Clone)]
pub struct HeadToHeadRow {
    pub player1_name: String,
    pub player2_name: String,
    pub record: HeadToHead,
}

/// Matches between two players inside one tournament, from the first player's side
#[derive(Debug, Clone, PartialEq)]
pub struct TournamentSplit {
    pub tournament_id: TournamentId,
    pub tournament_name: String,
    pub total: u32,
    pub player1_wins: u32,
    pub player2_wins: u32,
}

/// A unique pair that met inside one tournament, lower id first
#[derive(Debug, Clone, PartialEq)]
pub struct TournamentMatchup {
    pub player1_id: PlayerId,
    pub player1_name: String,
    pub player2_id: PlayerId,
    pub player2_name: String,
    pub matches_count: u32,
    pub player1_wins: u32,
    pub player2_wins: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TournamentMatchCount {
    pub tournament_id: TournamentId,
    pub tournament_name: String,
    pub matches_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: usize,
    pub limit: usize,
}

impl Page {
    pub fn new(skip: usize, limit: usize) -> Self {
        Self { skip, limit }
    }

    pub fn sql_limit(&self) -> i64 {
        sql_count(self.limit)
    }

    pub fn sql_offset(&self) -> i64 {
        sql_count(self.skip)
    }
}

/// SQLite binds integers as `i64`; larger counts saturate instead of wrapping
pub fn sql_count(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

impl Default for Page {
    fn default() -> Self {
        Self { skip: 0, limit: 100 }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MatchFilter {
    pub tournament_id: Option<TournamentId>,
    pub player_id: Option<PlayerId>,
    pub surface: Option<String>,
    pub page: Page,
}

impl StoredRating {
    pub fn bucket_rating(&self, bucket: RatingBucket) -> f64 {
        match bucket {
            RatingBucket::Overall => self.elo_rating,
            RatingBucket::Surface(Surface::Hard) => self.hard_court_elo,
            RatingBucket::Surface(Surface::Clay) => self.clay_court_elo,
            RatingBucket::Surface(Surface::Grass) => self.grass_court_elo,
            RatingBucket::Surface(Surface::Carpet) => self.carpet_court_elo,
            RatingBucket::Court(CourtType::Indoor) => self.indoor_elo,
            RatingBucket::Court(CourtType::Outdoor) => self.outdoor_elo,
        }
    }
}
