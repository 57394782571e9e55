use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "tennis-stats backend")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Start the backend server
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Create the database schema
    Setup {
        /// Drop every table first
        #[arg(long)]
        reset: bool,
    },
    /// Load matches and sports from JSON files
    Import {
        /// JSON array of match rows
        #[arg(long, value_name = "FILE")]
        matches: Option<PathBuf>,
        /// JSON array of sports
        #[arg(long, value_name = "FILE")]
        sports: Option<PathBuf>,
        /// Recompute derived statistics afterwards
        #[arg(long)]
        refresh: bool,
    },
    /// Recompute head-to-head, player-tournament stats and ratings
    Refresh,
    /// Print shell completions to stdout
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_arguments() {
        let cli = Cli::try_parse_from([
            "tennis_stats",
            "import",
            "--matches",
            "atp.json",
            "--refresh",
        ])
        .unwrap();

        assert_eq!(
            cli.command,
            Command::Import {
                matches: Some(PathBuf::from("atp.json")),
                sports: None,
                refresh: true,
            }
        );
    }

    #[test]
    fn test_serve_default_port() {
        let cli = Cli::try_parse_from(["tennis_stats", "serve"]).unwrap();
        assert_eq!(cli.command, Command::Serve { port: 3000 });
    }
}
