use anyhow::Result;
use colored::Colorize;

use tennis_stats::cli::Command;
use tennis_stats::{
    handle_completions, handle_import, handle_refresh, handle_serve, handle_setup, interpret,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("{} {e:#}", "Error:".red());
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Serve { port } => handle_serve(*port),
        Command::Setup { reset } => handle_setup(*reset),
        Command::Import {
            matches,
            sports,
            refresh,
        } => handle_import(matches.as_deref(), sports.as_deref(), *refresh),
        Command::Refresh => handle_refresh(),
        Command::Completions { shell } => handle_completions(*shell),
    }
}
