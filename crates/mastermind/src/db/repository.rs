//! Database repository for stored games.

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

use crate::db::{DbError, GameRecord, GameRecordUpdate, NewGameRecord, StoredStatus, schema};

/// Schema migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Repository over the `games` table of one SQLite file.
///
/// Every call opens its own connection; the repository itself holds only
/// the path and is cheap to clone.
#[derive(Debug, Clone)]
pub struct GameRepository {
    db_path: String,
}

impl GameRepository {
    /// Creates a repository for the database at `db_path`.
    ///
    /// The schema is not touched; call [`GameRepository::run_migrations`] or
    /// use [`GameRepository::open`].
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the path is empty.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, DbError> {
        if db_path.trim().is_empty() {
            return Err(DbError::new("Database path is empty"));
        }
        info!(path = %db_path, "Creating GameRepository");
        Ok(Self { db_path })
    }

    /// Creates a repository and brings its schema up to date.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the database cannot be opened or migrated.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn open(db_path: String) -> Result<Self, DbError> {
        let repository = Self::new(db_path)?;
        repository.run_migrations()?;
        Ok(repository)
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))
    }

    /// Applies any pending schema migrations.
    ///
    /// Returns the number of migrations applied.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a migration fails.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<usize, DbError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(format!("Migration failed: {}", e)))?;

        if applied.is_empty() {
            debug!("Schema up to date");
        } else {
            info!(count = applied.len(), "Migrations applied");
        }
        Ok(applied.len())
    }

    /// Inserts a new round.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, record), fields(status = %record.status()))]
    pub fn save_game(&self, record: NewGameRecord) -> Result<GameRecord, DbError> {
        debug!("Saving new game");
        let mut conn = self.connection()?;

        let saved = diesel::insert_into(schema::games::table)
            .values(&record)
            .returning(GameRecord::as_returning())
            .get_result(&mut conn)?;

        info!(game_id = saved.id(), "Game saved");
        Ok(saved)
    }

    /// Rewrites the status, completion time, and guesses of a round.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if no game has `game_id` or a database error occurs.
    #[instrument(skip(self, update), fields(status = %update.status()))]
    pub fn update_game(&self, game_id: i32, update: GameRecordUpdate) -> Result<GameRecord, DbError> {
        debug!("Updating game");
        let mut conn = self.connection()?;

        let updated = diesel::update(schema::games::table.find(game_id))
            .set(&update)
            .returning(GameRecord::as_returning())
            .get_result(&mut conn)
            .optional()?
            .ok_or_else(|| DbError::new(format!("Game {} not found", game_id)))?;

        debug!(game_id = updated.id(), status = %updated.status(), "Game updated");
        Ok(updated)
    }

    /// Returns the most recently started round, if any.
    ///
    /// Rounds started in the same instant are ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn last_game(&self) -> Result<Option<GameRecord>, DbError> {
        let mut conn = self.connection()?;

        let game = schema::games::table
            .order((schema::games::started_at.desc(), schema::games::id.desc()))
            .select(GameRecord::as_select())
            .first(&mut conn)
            .optional()?;

        match &game {
            Some(g) => debug!(game_id = g.id(), status = %g.status(), "Last game found"),
            None => debug!("No stored games"),
        }
        Ok(game)
    }

    /// True if the most recently started round is still in progress.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs or the status is unknown.
    #[instrument(skip(self))]
    pub fn is_last_game_incomplete(&self) -> Result<bool, DbError> {
        match self.last_game()? {
            Some(game) => Ok(game.parse_status()? == StoredStatus::InProgress),
            None => Ok(false),
        }
    }

    /// Lists every stored round, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn list_games(&self) -> Result<Vec<GameRecord>, DbError> {
        let mut conn = self.connection()?;

        let games = schema::games::table
            .order((schema::games::started_at.desc(), schema::games::id.desc()))
            .select(GameRecord::as_select())
            .load(&mut conn)?;

        info!(count = games.len(), "Games loaded");
        Ok(games)
    }

    /// Deletes every stored round, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn delete_all_games(&self) -> Result<usize, DbError> {
        let mut conn = self.connection()?;
        let deleted = diesel::delete(schema::games::table).execute(&mut conn)?;
        info!(deleted, "Game history cleared");
        Ok(deleted)
    }
}
