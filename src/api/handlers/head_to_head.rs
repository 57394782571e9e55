use axum::extract::State;
use axum::Json;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::{AppState, PlayerPairParams, require_players};
use crate::api::errors::{ApiError, ApiResult};
use crate::api::extract::ApiQuery;
use crate::api::models::{
    HeadToHeadDetailedResponse, HeadToHeadResponse, PlayerItem, PlayerRef, TournamentSplitItem,
};
use crate::database;
use crate::rating::expected_outcome;
use crate::stats::{HeadToHead, PlayerPair, SplitCounts};

/// Summary record plus a per-tournament breakdown. Counts follow the order
/// of the query parameters.
pub async fn get_head_to_head(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<PlayerPairParams>,
) -> ApiResult<HeadToHeadResponse> {
    let conn = state.connection()?;
    let (player1, player2) = require_players(&conn, &params)?;

    let record = PlayerPair::new(player1.id, player2.id)
        .map(|pair| database::head_to_head::find_pair(&conn, pair))
        .transpose()?
        .flatten()
        .ok_or_else(|| ApiError::not_found("Head-to-head record not found"))?
        .oriented_to(player1.id);

    let matches_by_tournament: BTreeMap<String, SplitCounts> =
        database::matches::tournament_splits(&conn, player1.id, player2.id)?
            .into_iter()
            .map(|split| {
                (
                    split.tournament_name,
                    SplitCounts {
                        total: split.total,
                        player1_wins: split.player1_wins,
                        player2_wins: split.player2_wins,
                    },
                )
            })
            .collect();

    Ok(Json(HeadToHeadResponse {
        player1: PlayerRef {
            id: player1.id,
            name: player1.name,
        },
        player2: PlayerRef {
            id: player2.id,
            name: player2.name,
        },
        total_matches: record.total_matches,
        player1_wins: record.player1_wins,
        player2_wins: record.player2_wins,
        matches_by_tournament,
    }))
}

/// Full split by surface and court, oriented to the caller's player order.
/// Players that never met get a zeroed record.
pub async fn get_head_to_head_detailed(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<PlayerPairParams>,
) -> ApiResult<HeadToHeadDetailedResponse> {
    let conn = state.connection()?;
    let (player1, player2) = require_players(&conn, &params)?;

    let pair = PlayerPair::new(player1.id, player2.id)
        .ok_or_else(|| ApiError::BadRequest("A player has no head-to-head with themselves".into()))?;

    let record = database::head_to_head::find_pair(&conn, pair)?
        .unwrap_or_else(|| HeadToHead::empty(pair))
        .oriented_to(player1.id);

    let tournaments = database::matches::tournament_splits(&conn, player1.id, player2.id)?
        .into_iter()
        .map(|split| {
            (
                split.tournament_name,
                TournamentSplitItem {
                    id: split.tournament_id,
                    total: split.total,
                    player1_wins: split.player1_wins,
                    player2_wins: split.player2_wins,
                },
            )
        })
        .collect();

    let default_rating = state.config.rating.default_rating;
    let overall = |id| -> Result<f64, ApiError> {
        Ok(database::ratings::find_for_player(&conn, id)?
            .map(|r| r.elo_rating)
            .unwrap_or(default_rating))
    };
    let player1_win_probability = expected_outcome(overall(player1.id)?, overall(player2.id)?);

    Ok(Json(HeadToHeadDetailedResponse {
        matchup_description: format!("{} vs {}", player1.name, player2.name),
        player1: PlayerItem::from(player1),
        player2: PlayerItem::from(player2),
        total_matches: record.total_matches,
        player1_wins: record.player1_wins,
        player2_wins: record.player2_wins,
        hard_court: record.hard_court,
        clay_court: record.clay_court,
        grass_court: record.grass_court,
        carpet_court: record.carpet_court,
        indoor: record.indoor,
        outdoor: record.outdoor,
        tournaments,
        player1_win_probability,
    }))
}
