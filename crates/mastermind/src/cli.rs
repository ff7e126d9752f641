//! Command-line interface for mastermind.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Mastermind - crack the secret code at the console
#[derive(Parser, Debug)]
#[command(name = "mastermind")]
#[command(about = "Console Mastermind with random.org secrets", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the settings file (created when options change)
    #[arg(long, global = true, default_value = mastermind::DEFAULT_SETTINGS_FILE)]
    pub config: PathBuf,

    /// Path to the game history database (created if it doesn't exist)
    #[arg(long, global = true, default_value = "mastermind_games.db")]
    pub db_path: String,

    /// Subcommand to run (defaults to `play`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Open the interactive menu
    Play,

    /// Print every stored game, newest first
    History,

    /// Delete every stored game
    ClearHistory,

    /// Show the remaining random.org quota
    Quota,

    /// Print the effective settings as TOML
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_arguments() {
        let cli = Cli::parse_from(["mastermind"]);
        assert_eq!(cli.config, PathBuf::from(mastermind::DEFAULT_SETTINGS_FILE));
        assert_eq!(cli.db_path, "mastermind_games.db");
        assert_eq!(cli.command, None);
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::parse_from(["mastermind", "history", "--config", "other.toml"]);
        assert_eq!(cli.config, PathBuf::from("other.toml"));
        assert_eq!(cli.command, Some(Command::History));
    }
}
