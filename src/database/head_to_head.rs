use std::collections::BTreeMap;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::{sql_count, HeadToHeadRow};
use crate::rating::PlayerId;
use crate::stats::{HeadToHead, PlayerPair, SplitCounts};

const H2H_COLUMNS: &str = "h.player1_id, h.player2_id, h.total_matches, h.player1_wins, h.player2_wins,
    h.hard_court_matches, h.hard_court_player1_wins, h.hard_court_player2_wins,
    h.clay_court_matches, h.clay_court_player1_wins, h.clay_court_player2_wins,
    h.grass_court_matches, h.grass_court_player1_wins, h.grass_court_player2_wins,
    h.carpet_court_matches, h.carpet_court_player1_wins, h.carpet_court_player2_wins,
    h.indoor_matches, h.indoor_player1_wins, h.indoor_player2_wins,
    h.outdoor_matches, h.outdoor_player1_wins, h.outdoor_player2_wins";

/// Swaps the stored table for `records`. Must run inside the caller's
/// transaction to keep readers from seeing a half-written table.
pub fn replace_all(conn: &Connection, records: &BTreeMap<PlayerPair, HeadToHead>) -> Result<usize> {
    conn.execute("DELETE FROM head_to_head", [])
        .context("Failed to clear head-to-head table")?;

    let sql = "INSERT INTO head_to_head (
            player1_id, player2_id, total_matches, player1_wins, player2_wins,
            hard_court_matches, hard_court_player1_wins, hard_court_player2_wins,
            clay_court_matches, clay_court_player1_wins, clay_court_player2_wins,
            grass_court_matches, grass_court_player1_wins, grass_court_player2_wins,
            carpet_court_matches, carpet_court_player1_wins, carpet_court_player2_wins,
            indoor_matches, indoor_player1_wins, indoor_player2_wins,
            outdoor_matches, outdoor_player1_wins, outdoor_player2_wins
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23)";

    let mut stmt = conn.prepare(sql)?;
    for h in records.values() {
        stmt.execute(params![
            h.player1_id,
            h.player2_id,
            h.total_matches,
            h.player1_wins,
            h.player2_wins,
            h.hard_court.total,
            h.hard_court.player1_wins,
            h.hard_court.player2_wins,
            h.clay_court.total,
            h.clay_court.player1_wins,
            h.clay_court.player2_wins,
            h.grass_court.total,
            h.grass_court.player1_wins,
            h.grass_court.player2_wins,
            h.carpet_court.total,
            h.carpet_court.player1_wins,
            h.carpet_court.player2_wins,
            h.indoor.total,
            h.indoor.player1_wins,
            h.indoor.player2_wins,
            h.outdoor.total,
            h.outdoor.player1_wins,
            h.outdoor.player2_wins
        ])
        .with_context(|| {
            format!(
                "Failed to insert head-to-head for players {} and {}",
                h.player1_id, h.player2_id
            )
        })?;
    }

    Ok(records.len())
}

fn parse_split(row: &rusqlite::Row, offset: usize) -> rusqlite::Result<SplitCounts> {
    Ok(SplitCounts {
        total: row.get(offset)?,
        player1_wins: row.get(offset + 1)?,
        player2_wins: row.get(offset + 2)?,
    })
}

fn parse_head_to_head_row(row: &rusqlite::Row) -> rusqlite::Result<HeadToHead> {
    Ok(HeadToHead {
        player1_id: row.get(0)?,
        player2_id: row.get(1)?,
        total_matches: row.get(2)?,
        player1_wins: row.get(3)?,
        player2_wins: row.get(4)?,
        hard_court: parse_split(row, 5)?,
        clay_court: parse_split(row, 8)?,
        grass_court: parse_split(row, 11)?,
        carpet_court: parse_split(row, 14)?,
        indoor: parse_split(row, 17)?,
        outdoor: parse_split(row, 20)?,
    })
}

fn parse_named_row(row: &rusqlite::Row) -> rusqlite::Result<HeadToHeadRow> {
    Ok(HeadToHeadRow {
        record: parse_head_to_head_row(row)?,
        player1_name: row.get(23)?,
        player2_name: row.get(24)?,
    })
}

pub fn find_pair(conn: &Connection, pair: PlayerPair) -> Result<Option<HeadToHead>> {
    let sql = format!(
        "SELECT {H2H_COLUMNS} FROM head_to_head h WHERE h.player1_id = ?1 AND h.player2_id = ?2"
    );

    conn.query_row(&sql, params![pair.low(), pair.high()], parse_head_to_head_row)
        .optional()
        .context("Failed to query head-to-head record")
}

/// Most played rivalries across the whole tour
pub fn list_top(conn: &Connection, limit: usize) -> Result<Vec<HeadToHeadRow>> {
    let sql = format!(
        "SELECT {H2H_COLUMNS}, p1.name, p2.name
         FROM head_to_head h
         JOIN players p1 ON p1.id = h.player1_id
         JOIN players p2 ON p2.id = h.player2_id
         ORDER BY h.total_matches DESC, h.player1_id, h.player2_id
         LIMIT ?1"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![sql_count(limit)], parse_named_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list top head-to-head records")?;

    Ok(rows)
}

pub fn list_for_player(conn: &Connection, player_id: PlayerId, limit: usize) -> Result<Vec<HeadToHeadRow>> {
    let sql = format!(
        "SELECT {H2H_COLUMNS}, p1.name, p2.name
         FROM head_to_head h
         JOIN players p1 ON p1.id = h.player1_id
         JOIN players p2 ON p2.id = h.player2_id
         WHERE h.player1_id = ?1 OR h.player2_id = ?1
         ORDER BY h.total_matches DESC, h.player1_id, h.player2_id
         LIMIT ?2"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![player_id, sql_count(limit)], parse_named_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list head-to-head records for player")?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::connection::{create_memory_pool, get_connection};
    use crate::database::setup::initialize_schema;
    use crate::stats::{compute_head_to_head, MatchRecord};

    fn setup() -> crate::database::DbConn {
        let pool = create_memory_pool().unwrap();
        let conn = get_connection(&pool).unwrap();
        initialize_schema(&conn).unwrap();
        conn.execute_batch("INSERT INTO players (name) VALUES ('Alice'), ('Bob'), ('Cara');")
            .unwrap();
        conn
    }

    fn record(id: i64, p1: i64, p2: i64, winner: i64, surface: &str) -> MatchRecord {
        MatchRecord {
            id,
            tournament_id: 1,
            player1_id: p1,
            player2_id: p2,
            winner_id: winner,
            surface: Some(surface.to_string()),
            court: Some("Outdoor".to_string()),
        }
    }

    #[test]
    fn test_replace_all_round_trips_every_bucket() {
        let conn = setup();
        let computed = compute_head_to_head(&[
            record(1, 2, 1, 2, "Clay"),
            record(2, 1, 2, 1, "Grass"),
            record(3, 3, 1, 3, "Hard"),
        ]);

        assert_eq!(replace_all(&conn, &computed).unwrap(), 2);

        let pair = PlayerPair::new(1, 2).unwrap();
        let stored = find_pair(&conn, pair).unwrap().unwrap();
        assert_eq!(stored, computed[&pair]);
    }

    #[test]
    fn test_replace_all_discards_stale_rows() {
        let conn = setup();
        replace_all(&conn, &compute_head_to_head(&[record(1, 1, 3, 1, "Hard")])).unwrap();
        replace_all(&conn, &compute_head_to_head(&[record(2, 1, 2, 2, "Hard")])).unwrap();

        assert!(find_pair(&conn, PlayerPair::new(1, 3).unwrap()).unwrap().is_none());
        assert!(find_pair(&conn, PlayerPair::new(1, 2).unwrap()).unwrap().is_some());
    }

    #[test]
    fn test_listing_orders_by_total_matches() {
        let conn = setup();
        replace_all(
            &conn,
            &compute_head_to_head(&[
                record(1, 1, 2, 1, "Hard"),
                record(2, 2, 3, 3, "Hard"),
                record(3, 3, 2, 3, "Clay"),
            ]),
        )
        .unwrap();

        let top = list_top(&conn, 1).unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!((top[0].player1_name.as_str(), top[0].player2_name.as_str()), ("Bob", "Cara"));

        let for_alice = list_for_player(&conn, 1, 10).unwrap();
        assert_eq!(for_alice.len(), 1);
        assert_eq!(for_alice[0].record.player1_wins, 1);
    }
}
