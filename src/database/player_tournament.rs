use std::collections::BTreeMap;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::{sql_count, PlayerTournamentRow};
use crate::rating::{PlayerId, TournamentId};
use crate::stats::{PlayerTournamentKey, PlayerTournamentStats};

const STATS_COLUMNS: &str = "pt.player_id, pt.tournament_id, pt.appearances, pt.wins, pt.losses,
    pt.hard_court_wins, pt.clay_court_wins, pt.grass_court_wins, pt.carpet_court_wins,
    pt.indoor_wins, pt.outdoor_wins, pt.elo_rating";

pub fn replace_all(
    conn: &Connection,
    records: &BTreeMap<PlayerTournamentKey, PlayerTournamentStats>,
) -> Result<usize> {
    conn.execute("DELETE FROM player_tournament", [])
        .context("Failed to clear player-tournament table")?;

    let sql = "INSERT INTO player_tournament (
            player_id, tournament_id, appearances, wins, losses,
            hard_court_wins, clay_court_wins, grass_court_wins, carpet_court_wins,
            indoor_wins, outdoor_wins, elo_rating
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)";

    let mut stmt = conn.prepare(sql)?;
    for s in records.values() {
        stmt.execute(params![
            s.player_id,
            s.tournament_id,
            s.appearances,
            s.wins,
            s.losses,
            s.hard_court_wins,
            s.clay_court_wins,
            s.grass_court_wins,
            s.carpet_court_wins,
            s.indoor_wins,
            s.outdoor_wins,
            s.elo_rating
        ])
        .with_context(|| {
            format!(
                "Failed to insert stats for player {} in tournament {}",
                s.player_id, s.tournament_id
            )
        })?;
    }

    Ok(records.len())
}

fn parse_stats_row(row: &rusqlite::Row) -> rusqlite::Result<PlayerTournamentStats> {
    Ok(PlayerTournamentStats {
        player_id: row.get(0)?,
        tournament_id: row.get(1)?,
        appearances: row.get(2)?,
        wins: row.get(3)?,
        losses: row.get(4)?,
        hard_court_wins: row.get(5)?,
        clay_court_wins: row.get(6)?,
        grass_court_wins: row.get(7)?,
        carpet_court_wins: row.get(8)?,
        indoor_wins: row.get(9)?,
        outdoor_wins: row.get(10)?,
        elo_rating: row.get(11)?,
    })
}

fn parse_named_row(row: &rusqlite::Row) -> rusqlite::Result<PlayerTournamentRow> {
    Ok(PlayerTournamentRow {
        stats: parse_stats_row(row)?,
        player_name: row.get(12)?,
        tournament_name: row.get(13)?,
    })
}

pub fn list(
    conn: &Connection,
    player_id: Option<PlayerId>,
    tournament_id: Option<TournamentId>,
) -> Result<Vec<PlayerTournamentRow>> {
    let sql = format!(
        "SELECT {STATS_COLUMNS}, p.name, t.name
         FROM player_tournament pt
         JOIN players p ON p.id = pt.player_id
         JOIN tournaments t ON t.id = pt.tournament_id
         WHERE (?1 IS NULL OR pt.player_id = ?1)
           AND (?2 IS NULL OR pt.tournament_id = ?2)
         ORDER BY pt.player_id, pt.tournament_id"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![player_id, tournament_id], parse_named_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list player-tournament stats")?;

    Ok(rows)
}

pub fn find(conn: &Connection, key: PlayerTournamentKey) -> Result<Option<PlayerTournamentStats>> {
    let sql = format!(
        "SELECT {STATS_COLUMNS} FROM player_tournament pt WHERE pt.player_id = ?1 AND pt.tournament_id = ?2"
    );

    conn.query_row(&sql, params![key.player_id, key.tournament_id], parse_stats_row)
        .optional()
        .context("Failed to query player-tournament stats")
}

/// A player's tournaments ordered by wins
pub fn top_for_player(conn: &Connection, player_id: PlayerId, limit: usize) -> Result<Vec<PlayerTournamentRow>> {
    let sql = format!(
        "SELECT {STATS_COLUMNS}, p.name, t.name
         FROM player_tournament pt
         JOIN players p ON p.id = pt.player_id
         JOIN tournaments t ON t.id = pt.tournament_id
         WHERE pt.player_id = ?1
         ORDER BY pt.wins DESC, pt.tournament_id
         LIMIT ?2"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![player_id, sql_count(limit)], parse_named_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list top tournaments for player")?;

    Ok(rows)
}

/// Best performers in a tournament by win ratio, then wins
pub fn top_for_tournament(
    conn: &Connection,
    tournament_id: TournamentId,
    limit: usize,
) -> Result<Vec<PlayerTournamentRow>> {
    let sql = format!(
        "SELECT {STATS_COLUMNS}, p.name, t.name
         FROM player_tournament pt
         JOIN players p ON p.id = pt.player_id
         JOIN tournaments t ON t.id = pt.tournament_id
         WHERE pt.tournament_id = ?1 AND pt.appearances > 0
         ORDER BY CAST(pt.wins AS REAL) / pt.appearances DESC, pt.wins DESC, pt.player_id
         LIMIT ?2"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![tournament_id, sql_count(limit)], parse_named_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list top players for tournament")?;

    Ok(rows)
}
