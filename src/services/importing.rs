use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use log::{debug, info};
use rusqlite::Connection;
use serde::Deserialize;

use crate::config::settings::AppConfig;
use crate::database::{self, DbPool, NewMatch, NewTournament};

const UNCATEGORIZED: &str = "Não categorizado";

/// Sentinel used by the source data for a missing number
const MISSING: i64 = -1;

/// One row of the match export. Numeric columns use `-1` for "unknown".
#[derive(Debug, Clone, Deserialize)]
pub struct MatchRow {
    #[serde(alias = "Tournament")]
    pub tournament: String,
    #[serde(default, alias = "Series")]
    pub series: Option<String>,
    #[serde(default, alias = "Court")]
    pub court: Option<String>,
    #[serde(default, alias = "Surface")]
    pub surface: Option<String>,
    #[serde(alias = "Date")]
    pub date: NaiveDate,
    #[serde(default, alias = "Round")]
    pub round: Option<String>,
    #[serde(default, alias = "Best of")]
    pub best_of: Option<i64>,
    #[serde(alias = "Player_1")]
    pub player_1: String,
    #[serde(alias = "Player_2")]
    pub player_2: String,
    #[serde(alias = "Winner")]
    pub winner: String,
    #[serde(default, alias = "Rank_1")]
    pub rank_1: Option<i64>,
    #[serde(default, alias = "Rank_2")]
    pub rank_2: Option<i64>,
    #[serde(default, alias = "Pts_1")]
    pub pts_1: Option<i64>,
    #[serde(default, alias = "Pts_2")]
    pub pts_2: Option<i64>,
    #[serde(default, alias = "Odd_1")]
    pub odd_1: Option<f64>,
    #[serde(default, alias = "Odd_2")]
    pub odd_2: Option<f64>,
    #[serde(default, alias = "Score")]
    pub score: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SportRow {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportSummary {
    pub matches: usize,
    pub players_created: usize,
    pub tournaments: usize,
}

pub struct ImportService {
    config: AppConfig,
    pool: DbPool,
}

impl ImportService {
    pub fn new(config: AppConfig, pool: DbPool) -> Self {
        Self { config, pool }
    }

    /// Loads a JSON array of match rows in a single transaction; a bad row
    /// aborts the whole file.
    pub fn import_matches(&self, path: &Path) -> Result<ImportSummary> {
        info!("Importing matches from {}", path.display());
        let rows: Vec<MatchRow> = read_json(path)?;
        info!("  → {} rows read", rows.len());

        let mut conn = database::get_connection(&self.pool)?;
        let tx = conn.transaction().context("Failed to open import transaction")?;

        let mut summary = ImportSummary::default();
        let mut seen_tournaments = std::collections::HashSet::new();

        for (idx, row) in rows.iter().enumerate() {
            let tournament_id = self
                .insert_row(&tx, row, &mut summary)
                .with_context(|| format!("Row {} ({} vs {})", idx + 1, row.player_1, row.player_2))?;
            seen_tournaments.insert(tournament_id);
        }
        summary.tournaments = seen_tournaments.len();

        tx.commit().context("Failed to commit match import")?;
        info!(
            "  → {} matches, {} new players, {} tournaments",
            summary.matches, summary.players_created, summary.tournaments
        );
        Ok(summary)
    }

    fn insert_row(&self, conn: &Connection, row: &MatchRow, summary: &mut ImportSummary) -> Result<i64> {
        if row.player_1 == row.player_2 {
            bail!("A player cannot face themselves: {}", row.player_1);
        }

        let tournament = database::tournaments::find_or_create(
            conn,
            &NewTournament {
                name: &row.tournament,
                series: row.series.as_deref(),
                court: row.court.as_deref(),
                surface: row.surface.as_deref(),
            },
        )?;

        let player1 = self.find_or_create_player(conn, &row.player_1, summary)?;
        let player2 = self.find_or_create_player(conn, &row.player_2, summary)?;

        let winner_id = if row.winner == row.player_1 {
            player1
        } else if row.winner == row.player_2 {
            player2
        } else {
            bail!("Winner {} is neither {} nor {}", row.winner, row.player_1, row.player_2);
        };

        let match_id = database::matches::insert_match(
            conn,
            &NewMatch {
                tournament_id: tournament.id,
                date: row.date,
                round: row.round.clone(),
                best_of: row.best_of,
                player1_id: player1,
                player2_id: player2,
                winner_id,
                rank1: known_int(row.rank_1),
                rank2: known_int(row.rank_2),
                pts1: known_int(row.pts_1),
                pts2: known_int(row.pts_2),
                odd1: known_float(row.odd_1),
                odd2: known_float(row.odd_2),
                score: row.score.clone(),
            },
        )?;
        debug!("Inserted match {} in {}", match_id, tournament.name);

        summary.matches += 1;
        Ok(tournament.id)
    }

    fn find_or_create_player(&self, conn: &Connection, name: &str, summary: &mut ImportSummary) -> Result<i64> {
        let (player, created) = database::players::find_or_create(conn, name)?;
        if created {
            database::ratings::ensure_default(conn, player.id, self.config.rating.default_rating)?;
            summary.players_created += 1;
        }
        Ok(player.id)
    }

    /// Loads a JSON array of `{ name, category }`
    pub fn import_sports(&self, path: &Path) -> Result<usize> {
        info!("Importing sports from {}", path.display());
        let rows: Vec<SportRow> = read_json(path)?;

        let mut conn = database::get_connection(&self.pool)?;
        let tx = conn.transaction().context("Failed to open import transaction")?;

        for row in &rows {
            let category = row
                .category
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .unwrap_or(UNCATEGORIZED);
            database::sports::insert_sport(&tx, &row.name, category)?;
        }

        tx.commit().context("Failed to commit sports import")?;
        info!("  → {} sports", rows.len());
        Ok(rows.len())
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| {
        format!(
            "Failed to parse JSON from {:?}. First 200 chars: {}",
            path,
            json.chars().take(200).collect::<String>()
        )
    })
}

fn known_int(value: Option<i64>) -> Option<i64> {
    value.filter(|&v| v != MISSING)
}

fn known_float(value: Option<f64>) -> Option<f64> {
    value.filter(|&v| v != MISSING as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::setup::initialize_schema;
    use crate::database::{create_memory_pool, get_connection, MatchFilter, Page};

    fn service() -> (ImportService, DbPool) {
        let pool = create_memory_pool().unwrap();
        initialize_schema(&get_connection(&pool).unwrap()).unwrap();
        (ImportService::new(AppConfig::default(), pool.clone()), pool)
    }

    fn write_fixture(dir: &Path, name: &str, json: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, json).unwrap();
        path
    }

    const MATCHES: &str = r#"[
        {"tournament": "Brisbane International", "series": "ATP250", "court": "Outdoor", "surface": "Hard",
         "date": "2024-01-01", "round": "1st Round", "best_of": 3,
         "player_1": "Alice", "player_2": "Bob", "winner": "Alice",
         "rank_1": 12, "rank_2": -1, "pts_1": 2100, "pts_2": -1, "odd_1": 1.4, "odd_2": -1.0, "score": "6-3 6-4"},
        {"Tournament": "Brisbane International", "Date": "2024-01-03", "Round": "2nd Round", "Best of": 3,
         "Player_1": "Cara", "Player_2": "Alice", "Winner": "Cara", "Score": "7-5 6-2"}
    ]"#;

    #[test]
    fn test_import_matches_creates_players_and_ratings() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_fixture(tmp.path(), "matches.json", MATCHES);
        let (service, pool) = service();

        let summary = service.import_matches(&path).unwrap();
        assert_eq!(
            summary,
            ImportSummary {
                matches: 2,
                players_created: 3,
                tournaments: 1
            }
        );

        let conn = get_connection(&pool).unwrap();
        assert_eq!(database::players::list_ids(&conn).unwrap().len(), 3);
        for id in database::players::list_ids(&conn).unwrap() {
            let rating = database::ratings::find_for_player(&conn, id).unwrap().unwrap();
            assert_eq!(rating.elo_rating, 1500.0);
        }

        let matches = database::matches::list(&conn, &MatchFilter::default()).unwrap();
        assert_eq!(matches[0].surface.as_deref(), Some("Hard"));
        assert_eq!(matches[1].winner_name, "Cara");
    }

    #[test]
    fn test_missing_number_sentinels_become_null() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_fixture(tmp.path(), "matches.json", MATCHES);
        let (service, pool) = service();
        service.import_matches(&path).unwrap();

        let conn = get_connection(&pool).unwrap();
        let (rank1, rank2, pts2, odd1, odd2): (Option<i64>, Option<i64>, Option<i64>, Option<f64>, Option<f64>) = conn
            .query_row(
                "SELECT rank1, rank2, pts2, odd1, odd2 FROM matches WHERE id = 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?)),
            )
            .unwrap();

        assert_eq!(rank1, Some(12));
        assert_eq!(rank2, None);
        assert_eq!(pts2, None);
        assert_eq!(odd1, Some(1.4));
        assert_eq!(odd2, None);
    }

    #[test]
    fn test_unknown_winner_aborts_whole_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_fixture(
            tmp.path(),
            "bad.json",
            r#"[
                {"tournament": "Open", "date": "2024-01-01", "player_1": "A", "player_2": "B", "winner": "A"},
                {"tournament": "Open", "date": "2024-01-02", "player_1": "A", "player_2": "B", "winner": "Z"}
            ]"#,
        );
        let (service, pool) = service();

        let err = service.import_matches(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Winner Z"));

        let conn = get_connection(&pool).unwrap();
        assert!(database::players::list_ids(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_import_sports_defaults_category() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_fixture(
            tmp.path(),
            "sports.json",
            r#"[{"name": "Tennis", "category": "Racket"}, {"name": "Curling"}, {"name": "Polo", "category": " "}]"#,
        );
        let (service, pool) = service();

        assert_eq!(service.import_sports(&path).unwrap(), 3);

        let conn = get_connection(&pool).unwrap();
        let sports = database::sports::list(&conn, Page::default()).unwrap();
        assert_eq!(sports[0].category, "Racket");
        assert_eq!(sports[1].category, UNCATEGORIZED);
        assert_eq!(sports[2].category, UNCATEGORIZED);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let (service, _pool) = service();
        assert!(service.import_sports(&tmp.path().join("nope.json")).is_err());
    }
}
