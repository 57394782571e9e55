use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::{sql_count, NewTournament, Page, Tournament, TournamentMatchCount};
use crate::rating::{PlayerId, TournamentId};

const TOURNAMENT_COLUMNS: &str =
    "t.id, t.name, t.series, t.court, t.surface, t.location, t.date, t.prize, t.img_url, t.created_at";

/// Tournaments are keyed by name; an existing row is returned untouched
pub fn find_or_create(conn: &Connection, tournament: &NewTournament) -> Result<Tournament> {
    if let Some(existing) = find_by_name(conn, tournament.name)? {
        return Ok(existing);
    }

    insert_new_tournament(conn, tournament)
}

fn find_by_name(conn: &Connection, name: &str) -> Result<Option<Tournament>> {
    let sql = format!("SELECT {TOURNAMENT_COLUMNS} FROM tournaments t WHERE t.name = ?1");

    conn.query_row(&sql, params![name], parse_tournament_row)
        .optional()
        .context("Failed to query tournament by name")
}

fn insert_new_tournament(conn: &Connection, tournament: &NewTournament) -> Result<Tournament> {
    let sql = "INSERT INTO tournaments (name, series, court, surface) VALUES (?1, ?2, ?3, ?4) RETURNING id, name, series, court, surface, location, date, prize, img_url, created_at";

    conn.query_row(
        sql,
        params![
            tournament.name,
            tournament.series,
            tournament.court,
            tournament.surface
        ],
        parse_tournament_row,
    )
    .context("Failed to insert new tournament")
}

fn parse_tournament_row(row: &rusqlite::Row) -> rusqlite::Result<Tournament> {
    Ok(Tournament {
        id: row.get(0)?,
        name: row.get(1)?,
        series: row.get(2)?,
        court: row.get(3)?,
        surface: row.get(4)?,
        location: row.get(5)?,
        date: row.get(6)?,
        prize: row.get(7)?,
        img_url: row.get(8)?,
        created_at: row.get(9)?,
    })
}

pub fn find_by_id(conn: &Connection, id: TournamentId) -> Result<Option<Tournament>> {
    let sql = format!("SELECT {TOURNAMENT_COLUMNS} FROM tournaments t WHERE t.id = ?1");

    conn.query_row(&sql, params![id], parse_tournament_row)
        .optional()
        .context("Failed to query tournament by id")
}

pub fn list(conn: &Connection, page: Page) -> Result<Vec<Tournament>> {
    let sql = format!(
        "SELECT {TOURNAMENT_COLUMNS} FROM tournaments t ORDER BY t.id LIMIT ?1 OFFSET ?2"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![page.sql_limit(), page.sql_offset()], parse_tournament_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list tournaments")?;

    Ok(rows)
}

/// Tournaments in which the player has at least one match
pub fn list_by_player(conn: &Connection, player_id: PlayerId) -> Result<Vec<Tournament>> {
    let sql = format!(
        "SELECT {TOURNAMENT_COLUMNS} FROM tournaments t
         WHERE t.id IN (
             SELECT tournament_id FROM matches WHERE player1_id = ?1 OR player2_id = ?1
         )
         ORDER BY t.name"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![player_id], parse_tournament_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list tournaments by player")?;

    Ok(rows)
}

pub fn top_by_match_count(conn: &Connection, limit: usize) -> Result<Vec<TournamentMatchCount>> {
    let sql = "
        SELECT t.id, t.name, COUNT(m.id) AS matches_count
        FROM tournaments t
        JOIN matches m ON m.tournament_id = t.id
        GROUP BY t.id, t.name
        ORDER BY matches_count DESC, t.id
        LIMIT ?1
    ";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![sql_count(limit)], |row| {
            Ok(TournamentMatchCount {
                tournament_id: row.get(0)?,
                tournament_name: row.get(1)?,
                matches_count: row.get(2)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to rank tournaments by match count")?;

    Ok(rows)
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
    fn test_find_or_create_keeps_first_attributes() {
        let conn = setup();
        let open = NewTournament {
            name: "Australian Open",
            series: Some("Grand Slam"),
            court: Some("Outdoor"),
            surface: Some("Hard"),
        };

        let first = find_or_create(&conn, &open).unwrap();
        let again = find_or_create(
            &conn,
            &NewTournament {
                surface: Some("Clay"),
                ..open.clone()
            },
        )
        .unwrap();

        assert_eq!(first.id, again.id);
        assert_eq!(again.surface.as_deref(), Some("Hard"));
        assert_eq!(again.series.as_deref(), Some("Grand Slam"));
    }

    #[test]
    fn test_list_by_player_and_match_counts() {
        let conn = setup();
        conn.execute_batch(
            "INSERT INTO players (name) VALUES ('A'), ('B'), ('C');
             INSERT INTO tournaments (name) VALUES ('Open'), ('Masters'), ('Empty');
             INSERT INTO matches (tournament_id, date, player1_id, player2_id, winner_id) VALUES
                 (1, '2024-01-01', 1, 2, 1),
                 (2, '2024-02-01', 2, 3, 3),
                 (2, '2024-02-02', 1, 3, 3);",
        )
        .unwrap();

        let names: Vec<String> = list_by_player(&conn, 2)
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["Masters", "Open"]);

        let counts = top_by_match_count(&conn, 5).unwrap();
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].tournament_name, "Masters");
        assert_eq!(counts[0].matches_count, 2);
    }

    #[test]
    fn test_find_by_id_missing() {
        let conn = setup();
        assert!(find_by_id(&conn, 1).unwrap().is_none());
    }
}
