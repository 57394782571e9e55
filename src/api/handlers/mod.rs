use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use serde::Deserialize;

use crate::api::errors::ApiError;
use crate::config::settings::AppConfig;
use crate::database::{self, DbConn, Page, Player, Tournament};
use crate::rating::{PlayerId, TournamentId};

pub mod admin;
pub mod head_to_head;
pub mod matches;
pub mod overview;
pub mod players;
pub mod ratings;
pub mod sports;
pub mod stats;
pub mod tournaments;

pub struct AppState {
    pub pool: Pool<SqliteConnectionManager>,
    pub config: AppConfig,
}

impl AppState {
    pub fn connection(&self) -> Result<DbConn, ApiError> {
        Ok(database::get_connection(&self.pool)?)
    }

    /// Requested window, with the limit clamped to the configured maximum
    pub fn page(&self, params: &PageParams) -> Page {
        let server = &self.config.server;
        Page::new(
            params.skip.unwrap_or(0),
            params
                .limit
                .unwrap_or(server.default_page_size)
                .clamp(1, server.max_page_size),
        )
    }
}

#[derive(Deserialize, Default)]
pub struct PageParams {
    pub skip: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct PlayerPairParams {
    pub player1_id: PlayerId,
    pub player2_id: PlayerId,
}

pub(crate) fn require_player(conn: &Connection, id: PlayerId) -> Result<Player, ApiError> {
    database::players::find_by_id(conn, id)?
        .ok_or_else(|| ApiError::not_found(format!("Player {id} not found")))
}

pub(crate) fn require_tournament(conn: &Connection, id: TournamentId) -> Result<Tournament, ApiError> {
    database::tournaments::find_by_id(conn, id)?
        .ok_or_else(|| ApiError::not_found(format!("Tournament {id} not found")))
}

pub(crate) fn require_players(
    conn: &Connection,
    params: &PlayerPairParams,
) -> Result<(Player, Player), ApiError> {
    let player1 = database::players::find_by_id(conn, params.player1_id)?;
    let player2 = database::players::find_by_id(conn, params.player2_id)?;
    match (player1, player2) {
        (Some(p1), Some(p2)) => Ok((p1, p2)),
        _ => Err(ApiError::not_found("One or both players not found")),
    }
}
