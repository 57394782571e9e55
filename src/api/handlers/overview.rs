use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;

use super::{AppState, require_player, require_tournament};
use crate::api::errors::ApiResult;
use crate::api::extract::ApiQuery;
use crate::api::models::{
    MatchItem, NotableMatchup, OverviewResponse, PlayerOverview, PlayerWinsItem, RivalItem,
    TopPlayerItem, TournamentCountItem, TournamentOverview, TournamentWinsItem,
};
use crate::database;
use crate::rating::{PlayerId, TournamentId};
use crate::stats::{RatingBucket, win_percentage};

const DEFAULT_OVERVIEW_LIMIT: usize = 5;

#[derive(Deserialize)]
pub struct OverviewParams {
    pub player_id: Option<PlayerId>,
    pub tournament_id: Option<TournamentId>,
    pub limit: Option<usize>,
}

/// Related data in one call: a player's best tournaments and rivals, a
/// tournament's best players and latest matches, or tour-wide highlights
/// when neither is given.
pub async fn get_overview(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<OverviewParams>,
) -> ApiResult<OverviewResponse> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_OVERVIEW_LIMIT)
        .clamp(1, state.config.server.max_page_size);
    let conn = state.connection()?;
    let mut response = OverviewResponse::default();

    if let Some(player_id) = params.player_id {
        let player = require_player(&conn, player_id)?;
        let tournaments = database::player_tournament::top_for_player(&conn, player_id, limit)?
            .into_iter()
            .map(|row| TournamentWinsItem {
                tournament_id: row.stats.tournament_id,
                tournament_name: row.tournament_name,
                wins: row.stats.wins,
                appearances: row.stats.appearances,
                win_rate: win_percentage(row.stats.wins, row.stats.appearances),
            })
            .collect();
        let rivals = database::head_to_head::list_for_player(&conn, player_id, limit)?
            .into_iter()
            .map(|row| RivalItem::from_row(row, player_id))
            .collect();

        response.player = Some(PlayerOverview {
            id: player.id,
            name: player.name,
            tournaments,
            rivals,
        });
    }

    if let Some(tournament_id) = params.tournament_id {
        let tournament = require_tournament(&conn, tournament_id)?;
        let top_players = database::player_tournament::top_for_tournament(&conn, tournament_id, limit)?
            .into_iter()
            .map(PlayerWinsItem::from)
            .collect();
        let memorable_matches =
            database::matches::list_recent_in_tournament(&conn, tournament_id, limit)?
                .into_iter()
                .map(MatchItem::from)
                .collect();

        response.tournament = Some(TournamentOverview {
            id: tournament.id,
            name: tournament.name,
            surface: tournament.surface,
            court: tournament.court,
            top_players,
            memorable_matches,
        });
    }

    if params.player_id.is_none() && params.tournament_id.is_none() {
        response.top_players = database::ratings::list_top(&conn, RatingBucket::Overall, limit)?
            .into_iter()
            .map(|r| TopPlayerItem {
                player_id: r.player_id,
                player_name: r.player_name,
                elo_rating: r.elo_rating,
            })
            .collect();
        response.top_tournaments = database::tournaments::top_by_match_count(&conn, limit)?
            .into_iter()
            .map(TournamentCountItem::from)
            .collect();
        response.notable_matchups = database::head_to_head::list_top(&conn, limit)?
            .into_iter()
            .map(NotableMatchup::from)
            .collect();
    }

    Ok(Json(response))
}
