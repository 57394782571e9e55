use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::Utc;
use log::info;
use rusqlite::Connection;

use crate::config::settings::AppConfig;
use crate::database::{self, DbPool};
use crate::stats::{AggregateSnapshot, StatsAggregator};

#[derive(Debug, Clone, PartialEq)]
pub struct RefreshSummary {
    pub players: usize,
    pub matches_processed: usize,
    pub matches_skipped: usize,
    pub head_to_head_records: usize,
    pub player_tournament_records: usize,
    pub ratings_updated: usize,
    pub elapsed: Duration,
}

/// Recomputes every derived table from the stored matches
pub struct StatsRefreshService {
    config: AppConfig,
    pool: DbPool,
}

impl StatsRefreshService {
    pub fn new(config: AppConfig, pool: DbPool) -> Self {
        Self { config, pool }
    }

    /// One pass, one transaction. Any failure rolls the whole flush back so
    /// readers keep seeing the previous derived state.
    pub fn run(&self) -> Result<RefreshSummary> {
        let started = Instant::now();
        info!("=== Starting Statistics Refresh ===\n");

        let mut conn = database::get_connection(&self.pool)?;
        let tx = conn
            .transaction()
            .context("Failed to open refresh transaction")?;

        info!("Step 1: Loading players and matches...");
        let players = database::players::list_ids(&tx)?;
        let matches = database::matches::list_for_aggregation(&tx)?;
        info!("  → {} players, {} matches\n", players.len(), matches.len());

        info!("Step 2: Aggregating...");
        let snapshot = StatsAggregator::new(&self.config.rating).run(&players, &matches);

        info!("Step 3: Writing derived tables...");
        let (head_to_head_records, player_tournament_records, ratings_updated) =
            self.flush(&tx, &snapshot)?;

        tx.commit().context("Failed to commit refresh transaction")?;

        let elapsed = started.elapsed();
        info!("=== Refresh Complete in {:.2?} ===", elapsed);

        Ok(RefreshSummary {
            players: players.len(),
            matches_processed: snapshot.matches_processed,
            matches_skipped: snapshot.matches_skipped,
            head_to_head_records,
            player_tournament_records,
            ratings_updated,
            elapsed,
        })
    }

    fn flush(&self, conn: &Connection, snapshot: &AggregateSnapshot) -> Result<(usize, usize, usize)> {
        let h2h = database::head_to_head::replace_all(conn, &snapshot.head_to_head)
            .context("Failed to write head-to-head records")?;
        info!("  → {} head-to-head rows", h2h);

        let player_tournament =
            database::player_tournament::replace_all(conn, &snapshot.player_tournament)
                .context("Failed to write player-tournament stats")?;
        info!("  → {} player-tournament rows", player_tournament);

        let ratings = database::ratings::upsert_all(
            conn,
            &snapshot.ratings,
            self.config.rating.default_rating,
            Utc::now().date_naive(),
        )
        .context("Failed to write player ratings")?;
        info!("  → {} ratings\n", ratings);

        Ok((h2h, player_tournament, ratings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::setup::initialize_schema;
    use crate::database::{create_memory_pool, get_connection};
    use crate::stats::{PlayerPair, PlayerTournamentKey};

    fn seeded_pool() -> DbPool {
        let pool = create_memory_pool().unwrap();
        let conn = get_connection(&pool).unwrap();
        initialize_schema(&conn).unwrap();
        conn.execute_batch(
            "INSERT INTO players (name) VALUES ('Alice'), ('Bob'), ('Cara'), ('Dan');
             INSERT INTO tournaments (name, surface, court) VALUES
                 ('Open', 'Hard', 'Outdoor'),
                 ('Indoors', 'Carpet', 'Indoor');
             INSERT INTO matches (tournament_id, date, player1_id, player2_id, winner_id) VALUES
                 (1, '2024-01-10', 1, 2, 1),
                 (1, '2024-01-12', 2, 1, 1),
                 (1, '2024-01-14', 3, 2, 3),
                 (2, '2024-03-01', 1, 3, 3);",
        )
        .unwrap();
        pool
    }

    #[test]
    fn test_refresh_writes_every_derived_table() {
        let pool = seeded_pool();
        let summary = StatsRefreshService::new(AppConfig::default(), pool.clone())
            .run()
            .unwrap();

        assert_eq!(summary.players, 4);
        assert_eq!(summary.matches_processed, 4);
        assert_eq!(summary.matches_skipped, 0);
        assert_eq!(summary.head_to_head_records, 3);
        assert_eq!(summary.player_tournament_records, 5);
        assert_eq!(summary.ratings_updated, 3);

        let conn = get_connection(&pool).unwrap();
        let alice_bob = database::head_to_head::find_pair(&conn, PlayerPair::new(2, 1).unwrap())
            .unwrap()
            .unwrap();
        assert_eq!((alice_bob.player1_wins, alice_bob.player2_wins), (2, 0));
        assert_eq!(alice_bob.hard_court.player1_wins, 2);

        let cara_indoors =
            database::player_tournament::find(&conn, PlayerTournamentKey::new(3, 2))
                .unwrap()
                .unwrap();
        assert_eq!(cara_indoors.carpet_court_wins, 1);
        assert_eq!(cara_indoors.indoor_wins, 1);

        // Dan never played, so his stored rating is left alone
        assert!(database::ratings::find_for_player(&conn, 4).unwrap().is_none());
        let alice = database::ratings::find_for_player(&conn, 1).unwrap().unwrap();
        assert!((alice.elo_rating - (1500.0 + 500.0 * 2.0 / 3.0)).abs() < 1e-9);
        assert_eq!(alice.matches_played, 3);
    }

    #[test]
    fn test_player_without_matches_keeps_default_rating() {
        let pool = seeded_pool();
        {
            let conn = get_connection(&pool).unwrap();
            assert!(database::ratings::ensure_default(&conn, 4, 1500.0).unwrap());
        }

        StatsRefreshService::new(AppConfig::default(), pool.clone())
            .run()
            .unwrap();

        let conn = get_connection(&pool).unwrap();
        let dan = database::ratings::find_for_player(&conn, 4).unwrap().unwrap();
        for rating in [
            dan.elo_rating,
            dan.hard_court_elo,
            dan.clay_court_elo,
            dan.grass_court_elo,
            dan.carpet_court_elo,
            dan.indoor_elo,
            dan.outdoor_elo,
        ] {
            assert_eq!(rating, 1500.0);
        }
        assert_eq!(dan.matches_played, 0);
    }

    #[test]
    fn test_refresh_is_idempotent() {
        let pool = seeded_pool();
        let service = StatsRefreshService::new(AppConfig::default(), pool.clone());

        service.run().unwrap();
        let first = dump_derived(&pool);
        service.run().unwrap();

        assert_eq!(first, dump_derived(&pool));
    }

    #[test]
    fn test_failed_flush_rolls_back() {
        let pool = seeded_pool();
        let service = StatsRefreshService::new(AppConfig::default(), pool.clone());
        service.run().unwrap();
        let before = database::head_to_head::list_top(&get_connection(&pool).unwrap(), 10)
            .unwrap()
            .len();

        {
            let conn = get_connection(&pool).unwrap();
            conn.execute_batch(
                "INSERT INTO matches (tournament_id, date, player1_id, player2_id, winner_id)
                     VALUES (2, '2024-03-02', 1, 4, 4);
                 DROP TABLE player_tournament;",
            )
            .unwrap();
        }

        assert!(service.run().is_err());

        let conn = get_connection(&pool).unwrap();
        let after = database::head_to_head::list_top(&conn, 10).unwrap();
        assert_eq!(after.len(), before);
        assert!(database::head_to_head::find_pair(&conn, PlayerPair::new(1, 4).unwrap())
            .unwrap()
            .is_none());
        assert!(database::ratings::find_for_player(&conn, 4).unwrap().is_none());
    }

    fn dump_derived(pool: &DbPool) -> Vec<String> {
        let conn = get_connection(pool).unwrap();
        let mut rows = Vec::new();
        for table in ["head_to_head", "player_tournament", "player_ratings"] {
            let mut stmt = conn
                .prepare(&format!("SELECT * FROM {table} ORDER BY 1, 2"))
                .unwrap();
            let columns = stmt.column_count();
            let mut query = stmt.query([]).unwrap();
            while let Some(row) = query.next().unwrap() {
                let values: Vec<String> = (0..columns)
                    .map(|i| format!("{:?}", row.get_ref(i).unwrap()))
                    .collect();
                rows.push(format!("{table}: {}", values.join(",")));
            }
        }
        rows
    }
}
