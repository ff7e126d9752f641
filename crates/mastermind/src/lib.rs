//! Mastermind console application.
//!
//! Wraps the game logic from [`mastermind_core`] with everything needed to
//! play at a terminal: true-random secrets from random.org, a TOML settings
//! file, SQLite game history with resume, and a menu-driven console.
//!
//! # Architecture
//!
//! - **Random**: random.org client and quota checker, local fallback
//! - **Settings**: `mastermind.toml` with `[game]` and `[random]` tables
//! - **Db / Persistence**: diesel repository and the resume-by-replay service
//! - **Console / Session / App**: prompts, round loop, menus
//!
//! # Example
//!
//! ```no_run
//! use mastermind::{GamePersistenceService, GameRepository, MenuController, Settings, build_engine};
//! use mastermind::console::Console;
//!
//! # fn example() -> anyhow::Result<()> {
//! let settings = Settings::from_file("mastermind.toml")?;
//! let repository = GameRepository::open("mastermind_games.db".to_string())?;
//! let engine = build_engine(settings.random());
//!
//! let stdin = std::io::stdin();
//! let console = Console::new(stdin.lock(), std::io::stdout());
//! let mut app = MenuController::new(
//!     console,
//!     engine,
//!     GamePersistenceService::new(repository),
//!     settings,
//!     "mastermind.toml".into(),
//! );
//! app.run()?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod app;
pub mod console;
mod db;
mod persistence;
mod random_org;
mod session;
mod settings;

pub use app::{MenuController, OPTION_MAX, OPTION_MIN};
pub use db::{
    DbError, GameRecord, GameRecordUpdate, GameRepository, MIGRATIONS, NewGameRecord, StoredStatus,
};
pub use persistence::{GamePersistenceService, ResumedGame, now};
pub use random_org::{MAX_MAGNITUDE, MAX_QUANTITY, QuotaChecker, RandomOrgSource, build_engine};
pub use session::GameSession;
pub use settings::{
    DEFAULT_INTEGERS_URL, DEFAULT_QUOTA_URL, DEFAULT_SETTINGS_FILE, DEFAULT_TIMEOUT_SECS,
    RandomSettings, Settings, SettingsError, SourceKind,
};
