use axum::extract::State;
use axum::Json;
use std::sync::Arc;

use super::{AppState, PageParams, require_player, require_tournament};
use crate::api::errors::ApiResult;
use crate::api::extract::{ApiPath, ApiQuery};
use crate::api::models::{PlayerItem, TournamentItem};
use crate::database;
use crate::rating::{PlayerId, TournamentId};

pub async fn get_players(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Vec<PlayerItem>> {
    let conn = state.connection()?;
    let players = database::players::list(&conn, state.page(&params))?;
    Ok(Json(players.into_iter().map(PlayerItem::from).collect()))
}

pub async fn get_player_tournaments(
    State(state): State<Arc<AppState>>,
    ApiPath(player_id): ApiPath<PlayerId>,
) -> ApiResult<Vec<TournamentItem>> {
    let conn = state.connection()?;
    require_player(&conn, player_id)?;

    let tournaments = database::tournaments::list_by_player(&conn, player_id)?;
    Ok(Json(tournaments.into_iter().map(TournamentItem::from).collect()))
}

pub async fn get_tournament_players(
    State(state): State<Arc<AppState>>,
    ApiPath(tournament_id): ApiPath<TournamentId>,
) -> ApiResult<Vec<PlayerItem>> {
    let conn = state.connection()?;
    require_tournament(&conn, tournament_id)?;

    let players = database::players::list_by_tournament(&conn, tournament_id)?;
    Ok(Json(players.into_iter().map(PlayerItem::from).collect()))
}
