//! Mastermind - console entry point.

#![warn(missing_docs)]

mod cli;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use mastermind::console::{Console, format_game_record};
use mastermind::{
    GamePersistenceService, GameRepository, MenuController, QuotaChecker, Settings, SourceKind,
    build_engine,
};
use tracing::{info, instrument, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    initialize_tracing();

    let cli = Cli::parse();
    let settings = Settings::from_file(&cli.config)?;

    match cli.command.unwrap_or(Command::Play) {
        Command::Play => run_play(settings, cli.config, cli.db_path),
        Command::History => print_history(cli.db_path),
        Command::ClearHistory => clear_history(cli.db_path),
        Command::Quota => print_quota(&settings),
        Command::Config => {
            print!("{}", settings.to_toml()?);
            Ok(())
        }
    }
}

/// Logs go to stderr so they never interleave with the game on stdout.
fn initialize_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,mastermind=info,mastermind_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Run the interactive menu
#[instrument(skip(settings))]
fn run_play(settings: Settings, settings_path: PathBuf, db_path: String) -> Result<()> {
    info!("Starting Mastermind");

    let repository = GameRepository::open(db_path)?;
    let engine = build_engine(settings.random());

    let quota = match settings.random().source() {
        SourceKind::RandomOrg => QuotaChecker::from_settings(settings.random())
            .inspect_err(|e| warn!(error = %e, "Quota checker unavailable"))
            .ok(),
        SourceKind::Local => None,
    };

    let stdin = std::io::stdin();
    let console = Console::new(stdin.lock(), std::io::stdout());
    let mut app = MenuController::new(
        console,
        engine,
        GamePersistenceService::new(repository),
        settings,
        settings_path,
    );
    if let Some(quota) = quota {
        app = app.with_quota_checker(quota);
    }

    app.run()?;
    info!("Mastermind exited");
    Ok(())
}

/// Print stored games
#[instrument]
fn print_history(db_path: String) -> Result<()> {
    let service = GamePersistenceService::new(GameRepository::open(db_path)?);
    let games = service.all_games()?;
    if games.is_empty() {
        println!("No games played yet.");
    }
    for game in &games {
        println!("{}", format_game_record(game));
    }
    Ok(())
}

/// Delete stored games
#[instrument]
fn clear_history(db_path: String) -> Result<()> {
    let service = GamePersistenceService::new(GameRepository::open(db_path)?);
    let deleted = service.clear_all_games()?;
    println!("Deleted {} games.", deleted);
    Ok(())
}

/// Print the remaining random.org quota
#[instrument(skip(settings))]
fn print_quota(settings: &Settings) -> Result<()> {
    let checker = QuotaChecker::from_settings(settings.random())?;
    let bits = checker.remaining_bits()?;
    println!("random.org quota remaining: {} bits", bits);
    Ok(())
}
