use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use super::models::{Page, Sport};

pub fn insert_sport(conn: &Connection, name: &str, category: &str) -> Result<Sport> {
    let sql = "INSERT INTO sports (name, category) VALUES (?1, ?2) RETURNING id, name, category";

    conn.query_row(sql, params![name, category], parse_sport_row)
        .context("Failed to insert sport")
}

fn parse_sport_row(row: &rusqlite::Row) -> rusqlite::Result<Sport> {
    Ok(Sport {
        id: row.get(0)?,
        name: row.get(1)?,
        category: row.get(2)?,
    })
}

pub fn list(conn: &Connection, page: Page) -> Result<Vec<Sport>> {
    let sql = "SELECT id, name, category FROM sports ORDER BY id LIMIT ?1 OFFSET ?2";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![page.sql_limit(), page.sql_offset()], parse_sport_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list sports")?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::connection::{create_memory_pool, get_connection};
    use crate::database::setup::initialize_schema;

    #[test]
    fn test_insert_and_list() {
        let pool = create_memory_pool().unwrap();
        let conn = get_connection(&pool).unwrap();
        initialize_schema(&conn).unwrap();

        let tennis = insert_sport(&conn, "Tennis", "Racket").unwrap();
        insert_sport(&conn, "Rowing", "Water").unwrap();

        assert_eq!(tennis.id, 1);
        let all = list(&conn, Page::default()).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].category, "Water");
        assert_eq!(list(&conn, Page::new(1, 10)).unwrap()[0].name, "Rowing");
    }
}
