use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;

use super::{AppState, PlayerPairParams, require_player, require_players};
use crate::api::errors::{ApiError, ApiResult};
use crate::api::extract::{ApiPath, ApiQuery};
use crate::api::models::{ForecastResponse, PlayerEloItem, PlayerRef};
use crate::database::{self, Player};
use crate::rating::{Contender, PlayerId, forecast};
use crate::stats::RatingBucket;

const DEFAULT_TOP_PLAYERS: usize = 20;

pub async fn get_player_elo(
    State(state): State<Arc<AppState>>,
    ApiPath(player_id): ApiPath<PlayerId>,
) -> ApiResult<PlayerEloItem> {
    let conn = state.connection()?;
    require_player(&conn, player_id)?;

    let rating = database::ratings::find_for_player(&conn, player_id)?
        .ok_or_else(|| ApiError::not_found(format!("No rating for player {player_id}")))?;
    Ok(Json(PlayerEloItem::from(rating)))
}

#[derive(Deserialize)]
pub struct TopPlayersParams {
    pub surface: Option<String>,
    pub limit: Option<usize>,
}

/// Ranking by any bucket; `surface` also accepts "indoor" and "outdoor"
pub async fn get_top_players(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<TopPlayersParams>,
) -> ApiResult<Vec<PlayerEloItem>> {
    let bucket = RatingBucket::from_query(params.surface.as_deref());
    let limit = params
        .limit
        .unwrap_or(DEFAULT_TOP_PLAYERS)
        .clamp(1, state.config.server.max_page_size);

    let conn = state.connection()?;
    let ratings = database::ratings::list_top(&conn, bucket, limit)?;
    Ok(Json(ratings.into_iter().map(PlayerEloItem::from).collect()))
}

#[derive(Deserialize)]
pub struct ForecastParams {
    pub player1_id: PlayerId,
    pub player2_id: PlayerId,
    pub surface: Option<String>,
}

/// Win probabilities and the rating each player would hold after the
/// next meeting, using the bucket picked by `surface`
pub async fn get_forecast(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<ForecastParams>,
) -> ApiResult<ForecastResponse> {
    let conn = state.connection()?;
    let (player1, player2) = require_players(
        &conn,
        &PlayerPairParams {
            player1_id: params.player1_id,
            player2_id: params.player2_id,
        },
    )?;
    if player1.id == player2.id {
        return Err(ApiError::BadRequest("Pick two different players".into()));
    }

    let bucket = RatingBucket::from_query(params.surface.as_deref());
    let contender = |player: &Player| -> Result<Contender, ApiError> {
        let rating = database::ratings::find_for_player(&conn, player.id)?
            .map(|r| r.bucket_rating(bucket))
            .unwrap_or(state.config.rating.default_rating);
        Ok(Contender {
            rating,
            matches_played: database::matches::count_for_player(&conn, player.id)?,
        })
    };

    let outlook = forecast(contender(&player1)?, contender(&player2)?, &state.config.rating.k_factor);

    Ok(Json(ForecastResponse {
        player1: PlayerRef {
            id: player1.id,
            name: player1.name,
        },
        player2: PlayerRef {
            id: player2.id,
            name: player2.name,
        },
        rating_type: bucket.column(),
        forecast: outlook,
    }))
}
