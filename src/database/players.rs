use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::{Page, Player};
use crate::rating::{PlayerId, TournamentId};

const PLAYER_COLUMNS: &str =
    "p.id, p.name, p.ranking, p.country, p.titles, p.grand_slams, p.hand, p.img_url, p.created_at";

/// Looks a player up by exact name, inserting it when missing. The flag is
/// true when the row was created by this call.
pub fn find_or_create(conn: &Connection, name: &str) -> Result<(Player, bool)> {
    if let Some(existing) = find_by_name(conn, name)? {
        return Ok((existing, false));
    }

    insert_new_player(conn, name).map(|player| (player, true))
}

fn find_by_name(conn: &Connection, name: &str) -> Result<Option<Player>> {
    let sql = format!("SELECT {PLAYER_COLUMNS} FROM players p WHERE p.name = ?1");

    conn.query_row(&sql, params![name], parse_player_row)
        .optional()
        .context("Failed to query player by name")
}

fn insert_new_player(conn: &Connection, name: &str) -> Result<Player> {
    let sql = "INSERT INTO players (name) VALUES (?1) RETURNING id, name, ranking, country, titles, grand_slams, hand, img_url, created_at";

    conn.query_row(sql, params![name], parse_player_row)
        .context("Failed to insert new player")
}

fn parse_player_row(row: &rusqlite::Row) -> rusqlite::Result<Player> {
    Ok(Player {
        id: row.get(0)?,
        name: row.get(1)?,
        ranking: row.get(2)?,
        country: row.get(3)?,
        titles: row.get(4)?,
        grand_slams: row.get(5)?,
        hand: row.get(6)?,
        img_url: row.get(7)?,
        created_at: row.get(8)?,
    })
}

pub fn find_by_id(conn: &Connection, id: PlayerId) -> Result<Option<Player>> {
    let sql = format!("SELECT {PLAYER_COLUMNS} FROM players p WHERE p.id = ?1");

    conn.query_row(&sql, params![id], parse_player_row)
        .optional()
        .context("Failed to query player by id")
}

pub fn list(conn: &Connection, page: Page) -> Result<Vec<Player>> {
    let sql = format!("SELECT {PLAYER_COLUMNS} FROM players p ORDER BY p.id LIMIT ?1 OFFSET ?2");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![page.sql_limit(), page.sql_offset()], parse_player_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list players")?;

    Ok(rows)
}

/// Every player with at least one match in the tournament
pub fn list_by_tournament(conn: &Connection, tournament_id: TournamentId) -> Result<Vec<Player>> {
    let sql = format!(
        "SELECT {PLAYER_COLUMNS} FROM players p
         WHERE p.id IN (
             SELECT player1_id FROM matches WHERE tournament_id = ?1
             UNION
             SELECT player2_id FROM matches WHERE tournament_id = ?1
         )
         ORDER BY p.name"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![tournament_id], parse_player_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list players by tournament")?;

    Ok(rows)
}

pub fn list_ids(conn: &Connection) -> Result<Vec<PlayerId>> {
    let mut stmt = conn.prepare("SELECT id FROM players ORDER BY id")?;
    let ids = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list player ids")?;

    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::connection::{create_memory_pool, get_connection};
    use crate::database::setup::initialize_schema;

    fn setup() -> crate::database::DbConn {
        let pool = create_memory_pool().unwrap();
        let conn = get_connection(&pool).unwrap();
        initialize_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn test_find_or_create_reuses_existing_row() {
        let conn = setup();

        let (first, created) = find_or_create(&conn, "Rafael Nadal").unwrap();
        assert!(created);
        let (second, created_again) = find_or_create(&conn, "Rafael Nadal").unwrap();
        assert!(!created_again);

        assert_eq!(first.id, second.id);
        assert_eq!(second.titles, 0);
        assert_eq!(list_ids(&conn).unwrap(), vec![first.id]);
    }

    #[test]
    fn test_find_by_id_missing() {
        let conn = setup();
        assert!(find_by_id(&conn, 99).unwrap().is_none());
    }

    #[test]
    fn test_list_respects_page() {
        let conn = setup();
        for name in ["A", "B", "C", "D"] {
            find_or_create(&conn, name).unwrap();
        }

        let names: Vec<String> = list(&conn, Page::new(1, 2))
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["B", "C"]);
    }

    #[test]
    fn test_skip_past_i64_range_is_empty() {
        let conn = setup();
        find_or_create(&conn, "A").unwrap();

        assert!(list(&conn, Page::new(usize::MAX, 10)).unwrap().is_empty());
        assert_eq!(list(&conn, Page::new(0, usize::MAX)).unwrap().len(), 1);
    }

    #[test]
    fn test_list_by_tournament_uses_matches() {
        let conn = setup();
        conn.execute_batch(
            "INSERT INTO players (name) VALUES ('Zed'), ('Amy'), ('Bob');
             INSERT INTO tournaments (name) VALUES ('Open'), ('Masters');
             INSERT INTO matches (tournament_id, date, player1_id, player2_id, winner_id)
                 VALUES (1, '2024-01-01', 1, 2, 1), (2, '2024-02-01', 2, 3, 3);",
        )
        .unwrap();

        let names: Vec<String> = list_by_tournament(&conn, 1)
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Amy", "Zed"]);
    }
}
