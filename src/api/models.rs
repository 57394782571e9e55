use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::database::models::{
    HeadToHeadRow, Match, Player, PlayerTournamentRow, Sport, StoredRating, Tournament,
    TournamentMatchCount, TournamentMatchup,
};
use crate::rating::{MatchupForecast, PlayerId, TournamentId};
use crate::stats::{SplitCounts, win_percentage};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SportItem {
    pub id: i64,
    pub name: String,
    pub category: String,
}

impl From<Sport> for SportItem {
    fn from(sport: Sport) -> Self {
        Self {
            id: sport.id,
            name: sport.name,
            category: sport.category,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerItem {
    pub id: PlayerId,
    pub name: String,
    pub ranking: Option<i64>,
    pub country: Option<String>,
    pub titles: i64,
    pub grand_slams: i64,
    pub hand: Option<String>,
    pub img_url: Option<String>,
}

impl From<Player> for PlayerItem {
    fn from(player: Player) -> Self {
        Self {
            id: player.id,
            name: player.name,
            ranking: player.ranking,
            country: player.country,
            titles: player.titles,
            grand_slams: player.grand_slams,
            hand: player.hand,
            img_url: player.img_url,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentItem {
    pub id: TournamentId,
    pub name: String,
    pub series: Option<String>,
    pub court: Option<String>,
    pub surface: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
    pub prize: Option<String>,
    pub img_url: Option<String>,
}

impl From<Tournament> for TournamentItem {
    fn from(t: Tournament) -> Self {
        Self {
            id: t.id,
            name: t.name,
            series: t.series,
            court: t.court,
            surface: t.surface,
            location: t.location,
            date: t.date,
            prize: t.prize,
            img_url: t.img_url,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchItem {
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

impl From<Match> for MatchItem {
    fn from(m: Match) -> Self {
        Self {
            id: m.id,
            tournament_id: m.tournament_id,
            tournament_name: m.tournament_name,
            surface: m.surface,
            court: m.court,
            date: m.date,
            round: m.round,
            best_of: m.best_of,
            player1_id: m.player1_id,
            player1_name: m.player1_name,
            player2_id: m.player2_id,
            player2_name: m.player2_name,
            winner_id: m.winner_id,
            winner_name: m.winner_name,
            score: m.score,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerTournamentStatsItem {
    pub player_id: PlayerId,
    pub player_name: String,
    pub tournament_id: TournamentId,
    pub tournament_name: String,
    pub appearances: u32,
    pub wins: u32,
    pub losses: u32,
    pub win_percentage: f64,
    pub hard_court_wins: u32,
    pub clay_court_wins: u32,
    pub grass_court_wins: u32,
    pub carpet_court_wins: u32,
    pub indoor_wins: u32,
    pub outdoor_wins: u32,
    pub performance_rating: f64,
}

impl From<PlayerTournamentRow> for PlayerTournamentStatsItem {
    fn from(row: PlayerTournamentRow) -> Self {
        let s = row.stats;
        Self {
            win_percentage: s.win_percentage(),
            player_id: s.player_id,
            player_name: row.player_name,
            tournament_id: s.tournament_id,
            tournament_name: row.tournament_name,
            appearances: s.appearances,
            wins: s.wins,
            losses: s.losses,
            hard_court_wins: s.hard_court_wins,
            clay_court_wins: s.clay_court_wins,
            grass_court_wins: s.grass_court_wins,
            carpet_court_wins: s.carpet_court_wins,
            indoor_wins: s.indoor_wins,
            outdoor_wins: s.outdoor_wins,
            performance_rating: s.elo_rating,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRef {
    pub id: PlayerId,
    pub name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadToHeadResponse {
    pub player1: PlayerRef,
    pub player2: PlayerRef,
    pub total_matches: u32,
    pub player1_wins: u32,
    pub player2_wins: u32,
    pub matches_by_tournament: BTreeMap<String, SplitCounts>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentSplitItem {
    pub id: TournamentId,
    pub total: u32,
    pub player1_wins: u32,
    pub player2_wins: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadToHeadDetailedResponse {
    pub player1: PlayerItem,
    pub player2: PlayerItem,
    pub matchup_description: String,
    pub total_matches: u32,
    pub player1_wins: u32,
    pub player2_wins: u32,
    pub hard_court: SplitCounts,
    pub clay_court: SplitCounts,
    pub grass_court: SplitCounts,
    pub carpet_court: SplitCounts,
    pub indoor: SplitCounts,
    pub outdoor: SplitCounts,
    pub tournaments: BTreeMap<String, TournamentSplitItem>,
    /// Chance that `player1` wins their next meeting, from overall ratings
    pub player1_win_probability: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerEloItem {
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
    pub last_updated: Option<NaiveDate>,
}

impl From<StoredRating> for PlayerEloItem {
    fn from(r: StoredRating) -> Self {
        Self {
            player_id: r.player_id,
            player_name: r.player_name,
            elo_rating: r.elo_rating,
            hard_court_elo: r.hard_court_elo,
            clay_court_elo: r.clay_court_elo,
            grass_court_elo: r.grass_court_elo,
            carpet_court_elo: r.carpet_court_elo,
            indoor_elo: r.indoor_elo,
            outdoor_elo: r.outdoor_elo,
            matches_played: r.matches_played,
            last_updated: r.last_updated,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentRef {
    pub id: TournamentId,
    pub name: String,
    pub surface: Option<String>,
    pub court: Option<String>,
}

#[derive(Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceStatistics {
    pub appearances: u32,
    pub wins: u32,
    pub losses: u32,
    pub win_percentage: f64,
    pub hard_court_wins: u32,
    pub clay_court_wins: u32,
    pub grass_court_wins: u32,
    pub carpet_court_wins: u32,
    pub indoor_wins: u32,
    pub outdoor_wins: u32,
    pub performance_rating: Option<f64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMatch {
    pub match_id: i64,
    pub date: NaiveDate,
    pub round: Option<String>,
    pub opponent_id: PlayerId,
    pub opponent_name: String,
    pub result: MatchResult,
    pub score: Option<String>,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    Win,
    Loss,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerTournamentPerformance {
    pub player: PlayerRef,
    pub tournament: TournamentRef,
    pub statistics: PerformanceStatistics,
    pub matches: Vec<PerformanceMatch>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpponentRecord {
    pub id: PlayerId,
    pub name: String,
    pub matches: u32,
    pub wins: u32,
    pub losses: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentOpponents {
    pub tournament_id: TournamentId,
    pub tournament_name: String,
    pub opponents: Vec<OpponentRecord>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentMatchupItem {
    pub player1_id: PlayerId,
    pub player1_name: String,
    pub player2_id: PlayerId,
    pub player2_name: String,
    pub matches_count: u32,
    pub player1_wins: u32,
    pub player2_wins: u32,
    pub tournament_id: TournamentId,
    pub tournament_name: String,
}

impl TournamentMatchupItem {
    pub fn new(matchup: TournamentMatchup, tournament: &Tournament) -> Self {
        Self {
            player1_id: matchup.player1_id,
            player1_name: matchup.player1_name,
            player2_id: matchup.player2_id,
            player2_name: matchup.player2_name,
            matches_count: matchup.matches_count,
            player1_wins: matchup.player1_wins,
            player2_wins: matchup.player2_wins,
            tournament_id: tournament.id,
            tournament_name: tournament.name.clone(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResponse {
    pub player1: PlayerRef,
    pub player2: PlayerRef,
    pub rating_type: &'static str,
    pub forecast: MatchupForecast,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopPlayerItem {
    pub player_id: PlayerId,
    pub player_name: String,
    pub elo_rating: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentCountItem {
    pub tournament_id: TournamentId,
    pub tournament_name: String,
    pub matches_count: u32,
}

impl From<TournamentMatchCount> for TournamentCountItem {
    fn from(t: TournamentMatchCount) -> Self {
        Self {
            tournament_id: t.tournament_id,
            tournament_name: t.tournament_name,
            matches_count: t.matches_count,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotableMatchup {
    pub player1_id: PlayerId,
    pub player1_name: String,
    pub player2_id: PlayerId,
    pub player2_name: String,
    pub total_matches: u32,
    pub player1_wins: u32,
    pub player2_wins: u32,
}

impl From<HeadToHeadRow> for NotableMatchup {
    fn from(row: HeadToHeadRow) -> Self {
        Self {
            player1_id: row.record.player1_id,
            player1_name: row.player1_name,
            player2_id: row.record.player2_id,
            player2_name: row.player2_name,
            total_matches: row.record.total_matches,
            player1_wins: row.record.player1_wins,
            player2_wins: row.record.player2_wins,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentWinsItem {
    pub tournament_id: TournamentId,
    pub tournament_name: String,
    pub wins: u32,
    pub appearances: u32,
    pub win_rate: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RivalItem {
    pub opponent_id: PlayerId,
    pub opponent_name: String,
    pub total_matches: u32,
    pub player_wins: u32,
    pub opponent_wins: u32,
}

impl RivalItem {
    /// `row` seen from `player_id`'s side
    pub fn from_row(row: HeadToHeadRow, player_id: PlayerId) -> Self {
        let oriented = row.record.oriented_to(player_id);
        let opponent_name = if row.record.player1_id == player_id {
            row.player2_name
        } else {
            row.player1_name
        };
        Self {
            opponent_id: oriented.player2_id,
            opponent_name,
            total_matches: oriented.total_matches,
            player_wins: oriented.player1_wins,
            opponent_wins: oriented.player2_wins,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerOverview {
    pub id: PlayerId,
    pub name: String,
    pub tournaments: Vec<TournamentWinsItem>,
    pub rivals: Vec<RivalItem>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerWinsItem {
    pub player_id: PlayerId,
    pub player_name: String,
    pub wins: u32,
    pub appearances: u32,
    pub win_rate: f64,
}

impl From<PlayerTournamentRow> for PlayerWinsItem {
    fn from(row: PlayerTournamentRow) -> Self {
        Self {
            player_id: row.stats.player_id,
            player_name: row.player_name,
            wins: row.stats.wins,
            appearances: row.stats.appearances,
            win_rate: win_percentage(row.stats.wins, row.stats.appearances),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentOverview {
    pub id: TournamentId,
    pub name: String,
    pub surface: Option<String>,
    pub court: Option<String>,
    pub top_players: Vec<PlayerWinsItem>,
    pub memorable_matches: Vec<MatchItem>,
}

#[derive(Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OverviewResponse {
    pub top_players: Vec<TopPlayerItem>,
    pub top_tournaments: Vec<TournamentCountItem>,
    pub notable_matchups: Vec<NotableMatchup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player: Option<PlayerOverview>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tournament: Option<TournamentOverview>,
}
