use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;

use super::{AppState, PageParams};
use crate::api::errors::ApiResult;
use crate::api::extract::ApiQuery;
use crate::api::models::MatchItem;
use crate::database::{self, MatchFilter};
use crate::rating::{PlayerId, TournamentId};

#[derive(Deserialize)]
pub struct MatchParams {
    pub tournament_id: Option<TournamentId>,
    pub player_id: Option<PlayerId>,
    pub surface: Option<String>,
    pub skip: Option<usize>,
    pub limit: Option<usize>,
}

pub async fn get_matches(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<MatchParams>,
) -> ApiResult<Vec<MatchItem>> {
    let page = state.page(&PageParams {
        skip: params.skip,
        limit: params.limit,
    });
    let filter = MatchFilter {
        tournament_id: params.tournament_id,
        player_id: params.player_id,
        surface: params.surface,
        page,
    };

    let conn = state.connection()?;
    let matches = database::matches::list(&conn, &filter)?;
    Ok(Json(matches.into_iter().map(MatchItem::from).collect()))
}
