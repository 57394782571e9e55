use std::collections::BTreeMap;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

use super::models::{sql_count, StoredRating};
use crate::rating::{PlayerId, PlayerRating, RatingValue};
use crate::stats::RatingBucket;

const RATING_COLUMNS: &str = "r.player_id, p.name, r.elo_rating, r.hard_court_elo, r.clay_court_elo,
    r.grass_court_elo, r.carpet_court_elo, r.indoor_elo, r.outdoor_elo,
    r.matches_played, r.active, r.last_updated";

/// Gives a player a rating row at `default_rating` unless one exists
pub fn ensure_default(conn: &Connection, player_id: PlayerId, default_rating: RatingValue) -> Result<bool> {
    let sql = "INSERT OR IGNORE INTO player_ratings (
            player_id, elo_rating, hard_court_elo, clay_court_elo, grass_court_elo,
            carpet_court_elo, indoor_elo, outdoor_elo
        ) VALUES (?1, ?2, ?2, ?2, ?2, ?2, ?2, ?2)";

    let inserted = conn
        .execute(sql, params![player_id, default_rating])
        .context("Failed to insert default rating")?;

    Ok(inserted > 0)
}

/// Writes freshly computed ratings. Buckets without a value keep whatever
/// is stored, or `default_rating` for a new row.
pub fn upsert_all(
    conn: &Connection,
    ratings: &BTreeMap<PlayerId, PlayerRating>,
    default_rating: RatingValue,
    updated_on: NaiveDate,
) -> Result<usize> {
    let sql = "INSERT INTO player_ratings (
            player_id, elo_rating, hard_court_elo, clay_court_elo, grass_court_elo,
            carpet_court_elo, indoor_elo, outdoor_elo, matches_played, active, last_updated
        ) VALUES (
            ?1, ?2, COALESCE(?3, ?10), COALESCE(?4, ?10), COALESCE(?5, ?10),
            COALESCE(?6, ?10), COALESCE(?7, ?10), COALESCE(?8, ?10), ?9, 1, ?11
        )
        ON CONFLICT(player_id) DO UPDATE SET
            elo_rating = excluded.elo_rating,
            hard_court_elo = COALESCE(?3, player_ratings.hard_court_elo),
            clay_court_elo = COALESCE(?4, player_ratings.clay_court_elo),
            grass_court_elo = COALESCE(?5, player_ratings.grass_court_elo),
            carpet_court_elo = COALESCE(?6, player_ratings.carpet_court_elo),
            indoor_elo = COALESCE(?7, player_ratings.indoor_elo),
            outdoor_elo = COALESCE(?8, player_ratings.outdoor_elo),
            matches_played = excluded.matches_played,
            active = 1,
            last_updated = excluded.last_updated";

    let mut stmt = conn.prepare(sql)?;
    for rating in ratings.values() {
        stmt.execute(params![
            rating.player_id,
            rating.overall,
            rating.hard_court,
            rating.clay_court,
            rating.grass_court,
            rating.carpet_court,
            rating.indoor,
            rating.outdoor,
            rating.matches_played,
            default_rating,
            updated_on
        ])
        .with_context(|| format!("Failed to upsert rating for player {}", rating.player_id))?;
    }

    Ok(ratings.len())
}

fn parse_rating_row(row: &rusqlite::Row) -> rusqlite::Result<StoredRating> {
    Ok(StoredRating {
        player_id: row.get(0)?,
        player_name: row.get(1)?,
        elo_rating: row.get(2)?,
        hard_court_elo: row.get(3)?,
        clay_court_elo: row.get(4)?,
        grass_court_elo: row.get(5)?,
        carpet_court_elo: row.get(6)?,
        indoor_elo: row.get(7)?,
        outdoor_elo: row.get(8)?,
        matches_played: row.get(9)?,
        active: row.get(10)?,
        last_updated: row.get(11)?,
    })
}

pub fn find_for_player(conn: &Connection, player_id: PlayerId) -> Result<Option<StoredRating>> {
    let sql = format!(
        "SELECT {RATING_COLUMNS}
         FROM player_ratings r
         JOIN players p ON p.id = r.player_id
         WHERE r.player_id = ?1"
    );

    conn.query_row(&sql, params![player_id], parse_rating_row)
        .optional()
        .context("Failed to query rating for player")
}

/// Highest rated players for one bucket
pub fn list_top(conn: &Connection, bucket: RatingBucket, limit: usize) -> Result<Vec<StoredRating>> {
    let sql = format!(
        "SELECT {RATING_COLUMNS}
         FROM player_ratings r
         JOIN players p ON p.id = r.player_id
         ORDER BY r.{} DESC, r.player_id
         LIMIT ?1",
        bucket.column()
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![sql_count(limit)], parse_rating_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list top rated players")?;

    Ok(rows)
}
