use anyhow::{Context, Result};
use rusqlite::Connection;

use super::connection::{create_pool, get_connection, DbPool};

/// Dependents first so foreign keys never block a drop
const TABLES: [&str; 7] = [
    "player_ratings",
    "player_tournament",
    "head_to_head",
    "matches",
    "tournaments",
    "players",
    "sports",
];

/// Creates any missing table or index, leaving existing data alone
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    let schema_sql = include_str!("schema.sql");
    let statements = split_sql_statements(schema_sql);

    for (idx, statement) in statements.iter().enumerate() {
        execute_sql(conn, statement)
            .with_context(|| format!("Failed to execute statement {}", idx + 1))?;
    }

    log::debug!("Schema ready ({} statements)", statements.len());
    Ok(())
}

/// Pool over the database file at `path`, with the schema in place
pub fn open_database(path: &str) -> Result<DbPool> {
    let pool = create_pool(path)?;
    let conn = get_connection(&pool)?;
    initialize_schema(&conn).with_context(|| format!("Failed to prepare database {path}"))?;
    Ok(pool)
}

pub fn reset_database(conn: &Connection) -> Result<()> {
    for table in TABLES {
        execute_sql(conn, &format!("DROP TABLE IF EXISTS {table}"))
            .with_context(|| format!("Failed to drop table {table}"))?;
    }
    initialize_schema(conn)?;

    log::info!("Database schema reset successfully");
    Ok(())
}

fn split_sql_statements(sql: &str) -> Vec<String> {
    sql.split(';')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn execute_sql(conn: &Connection, sql: &str) -> Result<()> {
    conn.execute(sql, [])
        .context("Failed to execute SQL statement")
        .map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::connection::{create_memory_pool, get_connection};

    fn table_count(conn: &Connection) -> i64 {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
            [],
            |row| row.get(0),
        )
        .unwrap()
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let pool = create_memory_pool().unwrap();
        let conn = get_connection(&pool).unwrap();

        initialize_schema(&conn).unwrap();
        conn.execute("INSERT INTO sports (name, category) VALUES ('Tennis', 'Racket')", [])
            .unwrap();
        initialize_schema(&conn).unwrap();

        assert_eq!(table_count(&conn), TABLES.len() as i64);
        let sports: i64 = conn
            .query_row("SELECT COUNT(*) FROM sports", [], |row| row.get(0))
            .unwrap();
        assert_eq!(sports, 1);
    }

    #[test]
    fn test_reset_drops_data() {
        let pool = create_memory_pool().unwrap();
        let conn = get_connection(&pool).unwrap();

        initialize_schema(&conn).unwrap();
        conn.execute("INSERT INTO players (name) VALUES ('Alice')", []).unwrap();
        reset_database(&conn).unwrap();

        let players: i64 = conn
            .query_row("SELECT COUNT(*) FROM players", [], |row| row.get(0))
            .unwrap();
        assert_eq!(players, 0);
        assert_eq!(table_count(&conn), TABLES.len() as i64);
    }

    #[test]
    fn test_match_checks_are_enforced() {
        let pool = create_memory_pool().unwrap();
        let conn = get_connection(&pool).unwrap();
        initialize_schema(&conn).unwrap();

        conn.execute_batch(
            "INSERT INTO players (name) VALUES ('A'), ('B'), ('C');
             INSERT INTO tournaments (name) VALUES ('Open');",
        )
        .unwrap();

        let winner_outside = conn.execute(
            "INSERT INTO matches (tournament_id, date, player1_id, player2_id, winner_id) VALUES (1, '2024-01-01', 1, 2, 3)",
            [],
        );
        assert!(winner_outside.is_err());

        let unknown_tournament = conn.execute(
            "INSERT INTO matches (tournament_id, date, player1_id, player2_id, winner_id) VALUES (9, '2024-01-01', 1, 2, 1)",
            [],
        );
        assert!(unknown_tournament.is_err());
    }

    #[test]
    fn test_open_database_creates_schema_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.db");
        let path = path.to_str().unwrap();

        let pool = open_database(path).unwrap();
        assert_eq!(table_count(&get_connection(&pool).unwrap()), TABLES.len() as i64);
        drop(pool);

        let reopened = open_database(path).unwrap();
        assert_eq!(table_count(&get_connection(&reopened).unwrap()), TABLES.len() as i64);
    }
}
