pub mod api;
pub mod cli;
pub mod config;
pub mod database;
pub mod rating;
pub mod services;
pub mod stats;

use anyhow::{Result, bail};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use cli::Cli;
use colored::Colorize;
use std::path::Path;

use crate::cli::Command;
use crate::config::settings::AppConfig;
use crate::services::importing::ImportService;
use crate::services::processing::{RefreshSummary, StatsRefreshService};
use crate::services::server::ServerService;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::from_env();
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_setup(reset: bool) -> Result<()> {
    let config = AppConfig::from_env();
    let pool = database::create_pool(&config.database.path)?;
    let conn = database::get_connection(&pool)?;

    if reset {
        database::setup::reset_database(&conn)?;
        println!("{} {}", "Database reset:".yellow(), config.database.path);
    } else {
        database::setup::initialize_schema(&conn)?;
        println!("{} {}", "Schema ready:".green(), config.database.path);
    }
    Ok(())
}

pub fn handle_import(matches: Option<&Path>, sports: Option<&Path>, refresh: bool) -> Result<()> {
    if matches.is_none() && sports.is_none() {
        bail!("Nothing to import, pass --matches and/or --sports");
    }

    let config = AppConfig::from_env();
    let pool = database::setup::open_database(&config.database.path)?;
    let service = ImportService::new(config.clone(), pool.clone());

    if let Some(path) = sports {
        let count = service.import_sports(path)?;
        println!("{} {}", "Sports imported:".green(), count);
    }

    if let Some(path) = matches {
        let summary = service.import_matches(path)?;
        println!("{} {}", "Matches imported:".green(), summary.matches);
        println!("  players created: {}", summary.players_created);
        println!("  tournaments:     {}", summary.tournaments);
    }

    if refresh {
        let summary = StatsRefreshService::new(config, pool).run()?;
        print_refresh_summary(&summary);
    }
    Ok(())
}

pub fn handle_refresh() -> Result<()> {
    let config = AppConfig::from_env();
    let pool = database::setup::open_database(&config.database.path)?;

    let summary = StatsRefreshService::new(config, pool).run()?;
    print_refresh_summary(&summary);
    Ok(())
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
    Ok(())
}

fn print_refresh_summary(summary: &RefreshSummary) {
    println!(
        "{} in {:.2?}",
        "Statistics refreshed".green().bold(),
        summary.elapsed
    );
    println!("  players:                  {}", summary.players);
    println!("  matches processed:        {}", summary.matches_processed);
    if summary.matches_skipped > 0 {
        println!(
            "  {}",
            format!("matches skipped:          {}", summary.matches_skipped).yellow()
        );
    }
    println!("  head-to-head records:     {}", summary.head_to_head_records);
    println!("  player-tournament rows:   {}", summary.player_tournament_records);
    println!("  ratings updated:          {}", summary.ratings_updated);
}
