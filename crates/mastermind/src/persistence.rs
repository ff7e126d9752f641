//! Game persistence business logic layer.

use chrono::{Local, NaiveDateTime};
use derive_getters::Getters;
use mastermind_core::{GameState, validate};
use tracing::{debug, info, instrument, warn};

use crate::db::{
    DbError, GameRecord, GameRecordUpdate, GameRepository, NewGameRecord, StoredStatus, to_column,
};

/// An interrupted round rebuilt from storage.
#[derive(Debug, Clone, Getters)]
pub struct ResumedGame {
    /// Row id to keep updating.
    game_id: i32,
    /// State after replaying every stored guess.
    state: GameState,
    /// When the round was first started.
    started_at: NaiveDateTime,
}

impl ResumedGame {
    /// Splits into the row id and the state.
    pub fn into_parts(self) -> (i32, GameState) {
        (self.game_id, self.state)
    }
}

/// Service layer translating between [`GameState`] and stored rows.
///
/// Wraps [`GameRepository`] with save-after-every-guess and resume
/// semantics.
#[derive(Debug, Clone)]
pub struct GamePersistenceService {
    repository: GameRepository,
}

impl GamePersistenceService {
    /// Creates a service backed by the given repository.
    #[instrument(skip(repository))]
    pub fn new(repository: GameRepository) -> Self {
        info!("Creating GamePersistenceService");
        Self { repository }
    }

    /// Returns the underlying repository.
    pub fn repository(&self) -> &GameRepository {
        &self.repository
    }

    /// Stores a freshly started round.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if encoding or the insert fails.
    #[instrument(skip(self, state), fields(attempts_made = state.attempts_made()))]
    pub fn save_new_game(
        &self,
        state: &GameState,
        started_at: NaiveDateTime,
    ) -> Result<GameRecord, DbError> {
        let record = NewGameRecord::new(
            state.secret_code().to_string(),
            to_column("max_attempts", state.max_attempts())?,
            to_column("code_length", state.code_length())?,
            to_column("max_number", state.max_number())?,
            StoredStatus::from(state.status()).to_db_string().to_string(),
            started_at,
            completion_time(state),
            serde_json::to_string(state.history())?,
        );
        self.repository.save_game(record)
    }

    /// Rewrites a stored round to match `state`.
    ///
    /// The completion time is set when the round has ended and cleared
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the row is missing or the update fails.
    #[instrument(skip(self, state), fields(status = %state.status()))]
    pub fn update_game(&self, state: &GameState, game_id: i32) -> Result<GameRecord, DbError> {
        let update = GameRecordUpdate::new(
            StoredStatus::from(state.status()).to_db_string().to_string(),
            completion_time(state),
            serde_json::to_string(state.history())?,
        );
        let record = self.repository.update_game(game_id, update)?;
        debug!(game_id, attempts_made = state.attempts_made(), "Game progress saved");
        Ok(record)
    }

    /// Rebuilds the newest round if it is still in progress.
    ///
    /// The state is recreated from the stored secret and rules, then every
    /// stored guess is replayed; stored scores are never trusted.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the row cannot be decoded or replayed, or the
    /// replay ends the round.
    #[instrument(skip(self))]
    pub fn last_incomplete_game(&self) -> Result<Option<ResumedGame>, DbError> {
        let Some(record) = self.repository.last_game()? else {
            return Ok(None);
        };
        if record.parse_status()? != StoredStatus::InProgress {
            debug!(game_id = record.id(), "Last game already finished");
            return Ok(None);
        }

        let config = record.config()?;
        let guesses = record
            .guesses()?
            .iter()
            .map(|g| {
                validate(
                    g.guess_text(),
                    config.code_length() as usize,
                    config.max_number(),
                )
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DbError::new(format!("Game {} has an invalid guess: {}", record.id(), e)))?;

        let state = GameState::replay(record.secret_code(), config, &guesses)
            .map_err(|e| DbError::new(format!("Game {} cannot be replayed: {}", record.id(), e)))?;

        if state.is_game_ended() {
            warn!(game_id = record.id(), status = %state.status(), "Stored game is marked in progress but has ended");
            return Err(DbError::new(format!(
                "Game {} is marked in progress but its guesses end it",
                record.id()
            )));
        }

        info!(
            game_id = record.id(),
            attempts_remaining = state.attempts_remaining(),
            "Incomplete game restored"
        );
        Ok(Some(ResumedGame {
            game_id: *record.id(),
            state,
            started_at: *record.started_at(),
        }))
    }

    /// Marks the newest round abandoned if it is still in progress.
    ///
    /// Returns the updated row, or `None` when there was nothing to abandon.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn mark_last_game_abandoned(&self) -> Result<Option<GameRecord>, DbError> {
        let Some(record) = self.repository.last_game()? else {
            return Ok(None);
        };
        if record.parse_status()? != StoredStatus::InProgress {
            return Ok(None);
        }

        let update = GameRecordUpdate::new(
            StoredStatus::Abandoned.to_db_string().to_string(),
            Some(now()),
            record.guesses_json().clone(),
        );
        let updated = self.repository.update_game(*record.id(), update)?;
        info!(game_id = updated.id(), "Game abandoned");
        Ok(Some(updated))
    }

    /// Every stored round, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn all_games(&self) -> Result<Vec<GameRecord>, DbError> {
        self.repository.list_games()
    }

    /// Deletes every stored round, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn clear_all_games(&self) -> Result<usize, DbError> {
        self.repository.delete_all_games()
    }
}

/// Local wall-clock time, as stored in timestamp columns.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn completion_time(state: &GameState) -> Option<NaiveDateTime> {
    state.is_game_ended().then(now)
}
