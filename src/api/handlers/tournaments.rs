use axum::extract::State;
use axum::Json;
use std::sync::Arc;

use super::{AppState, PageParams, require_tournament};
use crate::api::errors::ApiResult;
use crate::api::extract::{ApiPath, ApiQuery};
use crate::api::models::{TournamentItem, TournamentMatchupItem};
use crate::database;
use crate::rating::TournamentId;

pub async fn get_tournaments(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Vec<TournamentItem>> {
    let conn = state.connection()?;
    let tournaments = database::tournaments::list(&conn, state.page(&params))?;
    Ok(Json(tournaments.into_iter().map(TournamentItem::from).collect()))
}

/// Every pair of players that met in the tournament, with their win counts
pub async fn get_tournament_matchups(
    State(state): State<Arc<AppState>>,
    ApiPath(tournament_id): ApiPath<TournamentId>,
) -> ApiResult<Vec<TournamentMatchupItem>> {
    let conn = state.connection()?;
    let tournament = require_tournament(&conn, tournament_id)?;

    let matchups = database::matches::tournament_matchups(&conn, tournament_id)?;
    Ok(Json(
        matchups
            .into_iter()
            .map(|m| TournamentMatchupItem::new(m, &tournament))
            .collect(),
    ))
}
