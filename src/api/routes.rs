use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::handlers::{
    admin::admin_refresh,
    head_to_head::{get_head_to_head, get_head_to_head_detailed},
    matches::get_matches,
    overview::get_overview,
    players::{get_player_tournaments, get_players, get_tournament_players},
    ratings::{get_forecast, get_player_elo, get_top_players},
    sports::get_sports,
    stats::{get_player_tournament_matchups, get_player_tournament_performance, get_player_tournament_stats},
    tournaments::{get_tournament_matchups, get_tournaments},
    AppState,
};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/sports", get(get_sports))
        .route("/api/tennis/players", get(get_players))
        .route("/api/tennis/tournaments", get(get_tournaments))
        .route("/api/tennis/matches", get(get_matches))
        .route("/api/tennis/player/:id/tournaments", get(get_player_tournaments))
        .route("/api/tennis/tournament/:id/players", get(get_tournament_players))
        .route("/api/tennis/player-tournament-stats", get(get_player_tournament_stats))
        .route("/api/tennis/head-to-head", get(get_head_to_head))
        .route("/api/tennis/head-to-head-detailed", get(get_head_to_head_detailed))
        .route("/api/tennis/player/:id/elo", get(get_player_elo))
        .route("/api/tennis/top-players", get(get_top_players))
        .route(
            "/api/tennis/player/:id/tournament/:tournament_id/stats",
            get(get_player_tournament_performance),
        )
        .route("/api/tennis/player/:id/tournaments/matchups", get(get_player_tournament_matchups))
        .route("/api/tennis/tournament/:id/matchups", get(get_tournament_matchups))
        .route("/api/tennis/forecast", get(get_forecast))
        .route("/api/tennis/overview", get(get_overview))
        .route("/api/admin/refresh", post(admin_refresh))
        .with_state(state)
}
