use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use super::models::{sql_count, Match, MatchFilter, NewMatch, TournamentMatchup, TournamentSplit};
use crate::rating::{PlayerId, TournamentId};
use crate::stats::MatchRecord;

const MATCH_SELECT: &str = "
    SELECT m.id, m.tournament_id, t.name, t.surface, t.court, m.date, m.round, m.best_of,
           m.player1_id, p1.name, m.player2_id, p2.name, m.winner_id, w.name, m.score
    FROM matches m
    JOIN tournaments t ON t.id = m.tournament_id
    JOIN players p1 ON p1.id = m.player1_id
    JOIN players p2 ON p2.id = m.player2_id
    JOIN players w ON w.id = m.winner_id
";

pub fn insert_match(conn: &Connection, new_match: &NewMatch) -> Result<i64> {
    let sql = "INSERT INTO matches (tournament_id, date, round, best_of, player1_id, player2_id, winner_id, rank1, rank2, pts1, pts2, odd1, odd2, score) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14) RETURNING id";

    conn.query_row(
        sql,
        params![
            new_match.tournament_id,
            new_match.date,
            new_match.round,
            new_match.best_of,
            new_match.player1_id,
            new_match.player2_id,
            new_match.winner_id,
            new_match.rank1,
            new_match.rank2,
            new_match.pts1,
            new_match.pts2,
            new_match.odd1,
            new_match.odd2,
            new_match.score
        ],
        |row| row.get(0),
    )
    .context("Failed to insert match")
}

fn parse_match_row(row: &rusqlite::Row) -> rusqlite::Result<Match> {
    Ok(Match {
        id: row.get(0)?,
        tournament_id: row.get(1)?,
        tournament_name: row.get(2)?,
        surface: row.get(3)?,
        court: row.get(4)?,
        date: row.get(5)?,
        round: row.get(6)?,
        best_of: row.get(7)?,
        player1_id: row.get(8)?,
        player1_name: row.get(9)?,
        player2_id: row.get(10)?,
        player2_name: row.get(11)?,
        winner_id: row.get(12)?,
        winner_name: row.get(13)?,
        score: row.get(14)?,
    })
}

/// Filters left as `None` match everything; surface compares case-insensitively
pub fn list(conn: &Connection, filter: &MatchFilter) -> Result<Vec<Match>> {
    let sql = format!(
        "{MATCH_SELECT}
         WHERE (?1 IS NULL OR m.tournament_id = ?1)
           AND (?2 IS NULL OR m.player1_id = ?2 OR m.player2_id = ?2)
           AND (?3 IS NULL OR LOWER(t.surface) = LOWER(?3))
         ORDER BY m.date, m.id
         LIMIT ?4 OFFSET ?5"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(
            params![
                filter.tournament_id,
                filter.player_id,
                filter.surface,
                filter.page.sql_limit(),
                filter.page.sql_offset()
            ],
            parse_match_row,
        )?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list matches")?;

    Ok(rows)
}

/// The whole match set in the shape the aggregator consumes
pub fn list_for_aggregation(conn: &Connection) -> Result<Vec<MatchRecord>> {
    let sql = "
        SELECT m.id, m.tournament_id, m.player1_id, m.player2_id, m.winner_id, t.surface, t.court
        FROM matches m
        JOIN tournaments t ON t.id = m.tournament_id
        ORDER BY m.id
    ";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(MatchRecord {
                id: row.get(0)?,
                tournament_id: row.get(1)?,
                player1_id: row.get(2)?,
                player2_id: row.get(3)?,
                winner_id: row.get(4)?,
                surface: row.get(5)?,
                court: row.get(6)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to load matches for aggregation")?;

    Ok(rows)
}

/// Meetings of two players grouped by tournament, counted from `player_a`'s side
pub fn tournament_splits(
    conn: &Connection,
    player_a: PlayerId,
    player_b: PlayerId,
) -> Result<Vec<TournamentSplit>> {
    let sql = "
        SELECT t.id, t.name, COUNT(m.id),
               SUM(CASE WHEN m.winner_id = ?1 THEN 1 ELSE 0 END),
               SUM(CASE WHEN m.winner_id = ?2 THEN 1 ELSE 0 END)
        FROM matches m
        JOIN tournaments t ON t.id = m.tournament_id
        WHERE (m.player1_id = ?1 AND m.player2_id = ?2)
           OR (m.player1_id = ?2 AND m.player2_id = ?1)
        GROUP BY t.id, t.name
        ORDER BY t.name
    ";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![player_a, player_b], |row| {
            Ok(TournamentSplit {
                tournament_id: row.get(0)?,
                tournament_name: row.get(1)?,
                total: row.get(2)?,
                player1_wins: row.get(3)?,
                player2_wins: row.get(4)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to group head-to-head matches by tournament")?;

    Ok(rows)
}

pub fn list_for_player(conn: &Connection, player_id: PlayerId) -> Result<Vec<Match>> {
    let sql = format!(
        "{MATCH_SELECT}
         WHERE m.player1_id = ?1 OR m.player2_id = ?1
         ORDER BY t.name, m.date, m.id"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![player_id], parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list matches for player")?;

    Ok(rows)
}

pub fn list_for_player_in_tournament(
    conn: &Connection,
    player_id: PlayerId,
    tournament_id: TournamentId,
) -> Result<Vec<Match>> {
    let sql = format!(
        "{MATCH_SELECT}
         WHERE m.tournament_id = ?2 AND (m.player1_id = ?1 OR m.player2_id = ?1)
         ORDER BY m.date, m.id"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![player_id, tournament_id], parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list player matches in tournament")?;

    Ok(rows)
}

pub fn list_recent_in_tournament(
    conn: &Connection,
    tournament_id: TournamentId,
    limit: usize,
) -> Result<Vec<Match>> {
    let sql = format!(
        "{MATCH_SELECT}
         WHERE m.tournament_id = ?1
         ORDER BY m.date DESC, m.id DESC
         LIMIT ?2"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![tournament_id, sql_count(limit)], parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list recent tournament matches")?;

    Ok(rows)
}

/// Every unique pair that met in the tournament, lower id first
pub fn tournament_matchups(conn: &Connection, tournament_id: TournamentId) -> Result<Vec<TournamentMatchup>> {
    let sql = "
        SELECT pairs.low_id, pl.name, pairs.high_id, ph.name,
               pairs.matches_count, pairs.low_wins, pairs.high_wins
        FROM (
            SELECT MIN(m.player1_id, m.player2_id) AS low_id,
                   MAX(m.player1_id, m.player2_id) AS high_id,
                   COUNT(*) AS matches_count,
                   SUM(CASE WHEN m.winner_id = MIN(m.player1_id, m.player2_id) THEN 1 ELSE 0 END) AS low_wins,
                   SUM(CASE WHEN m.winner_id = MAX(m.player1_id, m.player2_id) THEN 1 ELSE 0 END) AS high_wins
            FROM matches m
            WHERE m.tournament_id = ?1
            GROUP BY low_id, high_id
        ) pairs
        JOIN players pl ON pl.id = pairs.low_id
        JOIN players ph ON ph.id = pairs.high_id
        ORDER BY pairs.matches_count DESC, pairs.low_id, pairs.high_id
    ";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![tournament_id], |row| {
            Ok(TournamentMatchup {
                player1_id: row.get(0)?,
                player1_name: row.get(1)?,
                player2_id: row.get(2)?,
                player2_name: row.get(3)?,
                matches_count: row.get(4)?,
                player1_wins: row.get(5)?,
                player2_wins: row.get(6)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list tournament matchups")?;

    Ok(rows)
}

pub fn count_for_player(conn: &Connection, player_id: PlayerId) -> Result<u32> {
    let sql = "SELECT COUNT(*) FROM matches WHERE player1_id = ?1 OR player2_id = ?1";
    conn.query_row(sql, params![player_id], |row| row.get(0))
        .context("Failed to count matches for player")
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::database::connection::{create_memory_pool, get_connection};
    use crate::database::models::Page;
    use crate::database::setup::initialize_schema;

    fn setup() -> crate::database::DbConn {
        let pool = create_memory_pool().unwrap();
        let conn = get_connection(&pool).unwrap();
        initialize_schema(&conn).unwrap();
        conn.execute_batch(
            "INSERT INTO players (name) VALUES ('Alice'), ('Bob'), ('Cara');
             INSERT INTO tournaments (name, surface, court) VALUES
                 ('Roland Garros', 'Clay', 'Outdoor'),
                 ('Paris Masters', 'Hard', 'Indoor');
             INSERT INTO matches (tournament_id, date, round, player1_id, player2_id, winner_id, score) VALUES
                 (1, '2024-05-27', '1st Round', 1, 2, 1, '6-4 6-4'),
                 (1, '2024-05-30', '2nd Round', 1, 3, 3, '3-6 4-6'),
                 (2, '2024-10-28', '1st Round', 2, 1, 2, '7-6 6-3'),
                 (1, '2024-06-02', '4th Round', 2, 1, 1, '6-1 6-2');",
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_insert_match_returns_id() {
        let conn = setup();
        let id = insert_match(
            &conn,
            &NewMatch {
                tournament_id: 2,
                date: NaiveDate::from_ymd_opt(2024, 11, 1).unwrap(),
                round: Some("Quarterfinals".to_string()),
                best_of: Some(3),
                player1_id: 3,
                player2_id: 2,
                winner_id: 3,
                rank1: Some(4),
                rank2: None,
                pts1: None,
                pts2: None,
                odd1: Some(1.5),
                odd2: Some(2.6),
                score: None,
            },
        )
        .unwrap();

        assert_eq!(id, 5);
        assert_eq!(count_for_player(&conn, 3).unwrap(), 2);
    }

    #[test]
    fn test_list_filters() {
        let conn = setup();

        let clay = list(
            &conn,
            &MatchFilter {
                surface: Some("clay".to_string()),
                ..MatchFilter::default()
            },
        )
        .unwrap();
        assert_eq!(clay.len(), 3);
        assert!(clay.iter().all(|m| m.tournament_name == "Roland Garros"));

        let cara = list(
            &conn,
            &MatchFilter {
                player_id: Some(3),
                ..MatchFilter::default()
            },
        )
        .unwrap();
        assert_eq!(cara.len(), 1);
        assert_eq!(cara[0].winner_name, "Cara");

        let paged = list(
            &conn,
            &MatchFilter {
                page: Page::new(1, 1),
                ..MatchFilter::default()
            },
        )
        .unwrap();
        assert_eq!(paged[0].round.as_deref(), Some("2nd Round"));
    }

    #[test]
    fn test_aggregation_rows_carry_tournament_surface() {
        let conn = setup();
        let records = list_for_aggregation(&conn).unwrap();

        assert_eq!(records.len(), 4);
        assert_eq!(records[2].surface.as_deref(), Some("Hard"));
        assert_eq!(records[2].court.as_deref(), Some("Indoor"));
    }

    #[test]
    fn test_tournament_splits_follow_first_player() {
        let conn = setup();

        let splits = tournament_splits(&conn, 2, 1).unwrap();
        assert_eq!(splits.len(), 2);
        let paris = &splits[0];
        assert_eq!(paris.tournament_name, "Paris Masters");
        assert_eq!((paris.total, paris.player1_wins, paris.player2_wins), (1, 1, 0));
        let rg = &splits[1];
        assert_eq!((rg.total, rg.player1_wins, rg.player2_wins), (2, 0, 2));
    }

    #[test]
    fn test_tournament_matchups_are_canonical() {
        let conn = setup();
        let matchups = tournament_matchups(&conn, 1).unwrap();

        assert_eq!(matchups.len(), 2);
        let first = &matchups[0];
        assert_eq!((first.player1_id, first.player2_id), (1, 2));
        assert_eq!(first.matches_count, 2);
        assert_eq!((first.player1_wins, first.player2_wins), (2, 0));
        assert_eq!(first.player2_name, "Bob");
    }

    #[test]
    fn test_player_scoped_queries() {
        let conn = setup();

        let in_rg = list_for_player_in_tournament(&conn, 1, 1).unwrap();
        assert_eq!(in_rg.len(), 3);
        assert_eq!(in_rg[0].opponent_of(1), (2, "Bob"));

        let recent = list_recent_in_tournament(&conn, 1, 2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].round.as_deref(), Some("4th Round"));

        assert_eq!(list_for_player(&conn, 1).unwrap().len(), 4);
    }
}
