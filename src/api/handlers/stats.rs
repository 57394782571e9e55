use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::{AppState, require_player, require_tournament};
use crate::api::errors::ApiResult;
use crate::api::extract::{ApiPath, ApiQuery};
use crate::api::models::{
    MatchResult, OpponentRecord, PerformanceMatch, PerformanceStatistics, PlayerRef,
    PlayerTournamentPerformance, PlayerTournamentStatsItem, TournamentOpponents, TournamentRef,
};
use crate::database;
use crate::rating::{PlayerId, TournamentId};
use crate::stats::PlayerTournamentKey;

#[derive(Deserialize)]
pub struct PlayerTournamentParams {
    pub player_id: Option<PlayerId>,
    pub tournament_id: Option<TournamentId>,
}

pub async fn get_player_tournament_stats(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<PlayerTournamentParams>,
) -> ApiResult<Vec<PlayerTournamentStatsItem>> {
    let conn = state.connection()?;
    let rows = database::player_tournament::list(&conn, params.player_id, params.tournament_id)?;
    Ok(Json(rows.into_iter().map(PlayerTournamentStatsItem::from).collect()))
}

/// One player's numbers and match list inside one tournament
pub async fn get_player_tournament_performance(
    State(state): State<Arc<AppState>>,
    ApiPath((player_id, tournament_id)): ApiPath<(PlayerId, TournamentId)>,
) -> ApiResult<PlayerTournamentPerformance> {
    let conn = state.connection()?;
    let player = require_player(&conn, player_id)?;
    let tournament = require_tournament(&conn, tournament_id)?;

    let statistics = database::player_tournament::find(
        &conn,
        PlayerTournamentKey::new(player_id, tournament_id),
    )?
    .map(|s| PerformanceStatistics {
        appearances: s.appearances,
        wins: s.wins,
        losses: s.losses,
        win_percentage: s.win_percentage(),
        hard_court_wins: s.hard_court_wins,
        clay_court_wins: s.clay_court_wins,
        grass_court_wins: s.grass_court_wins,
        carpet_court_wins: s.carpet_court_wins,
        indoor_wins: s.indoor_wins,
        outdoor_wins: s.outdoor_wins,
        performance_rating: Some(s.elo_rating),
    })
    .unwrap_or_default();

    let matches = database::matches::list_for_player_in_tournament(&conn, player_id, tournament_id)?
        .into_iter()
        .map(|m| {
            let (opponent_id, opponent_name) = m.opponent_of(player_id);
            PerformanceMatch {
                match_id: m.id,
                date: m.date,
                round: m.round.clone(),
                opponent_id,
                opponent_name: opponent_name.to_string(),
                result: if m.winner_id == player_id {
                    MatchResult::Win
                } else {
                    MatchResult::Loss
                },
                score: m.score.clone(),
            }
        })
        .collect();

    Ok(Json(PlayerTournamentPerformance {
        player: PlayerRef {
            id: player.id,
            name: player.name,
        },
        tournament: TournamentRef {
            id: tournament.id,
            name: tournament.name,
            surface: tournament.surface,
            court: tournament.court,
        },
        statistics,
        matches,
    }))
}

/// Opponents faced by a player, grouped by tournament
pub async fn get_player_tournament_matchups(
    State(state): State<Arc<AppState>>,
    ApiPath(player_id): ApiPath<PlayerId>,
) -> ApiResult<Vec<TournamentOpponents>> {
    let conn = state.connection()?;
    require_player(&conn, player_id)?;

    // matches arrive ordered by tournament name, so each group is contiguous
    let mut grouped: Vec<(TournamentOpponents, BTreeMap<PlayerId, OpponentRecord>)> = Vec::new();
    for m in database::matches::list_for_player(&conn, player_id)? {
        if grouped.last().map(|(t, _)| t.tournament_id) != Some(m.tournament_id) {
            grouped.push((
                TournamentOpponents {
                    tournament_id: m.tournament_id,
                    tournament_name: m.tournament_name.clone(),
                    opponents: Vec::new(),
                },
                BTreeMap::new(),
            ));
        }
        let Some((_, opponents)) = grouped.last_mut() else {
            continue;
        };

        let (opponent_id, opponent_name) = m.opponent_of(player_id);
        let record = opponents.entry(opponent_id).or_insert_with(|| OpponentRecord {
            id: opponent_id,
            name: opponent_name.to_string(),
            matches: 0,
            wins: 0,
            losses: 0,
        });
        record.matches += 1;
        if m.winner_id == player_id {
            record.wins += 1;
        } else {
            record.losses += 1;
        }
    }

    Ok(Json(
        grouped
            .into_iter()
            .map(|(mut tournament, opponents)| {
                tournament.opponents = opponents.into_values().collect();
                tournament
            })
            .collect(),
    ))
}
