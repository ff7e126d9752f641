//! Stored game rows and their conversion to domain types.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_more::Display;
use derive_new::new;
use diesel::prelude::*;
use mastermind_core::{GameConfig, GameStatus, GuessResult};
use tracing::instrument;

use crate::db::{DbError, schema};

/// One stored round.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::games)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GameRecord {
    id: i32,
    secret_code: String,
    max_attempts: i32,
    code_length: i32,
    max_number: i32,
    status: String,
    started_at: NaiveDateTime,
    completed_at: Option<NaiveDateTime>,
    guesses_json: String,
}

impl GameRecord {
    /// Parses the stored status column.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the column holds an unknown value.
    #[instrument(skip(self), fields(game_id = self.id, status = %self.status))]
    pub fn parse_status(&self) -> Result<StoredStatus, DbError> {
        StoredStatus::from_db_string(&self.status)
    }

    /// Rebuilds the rules the round was played with.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a column is negative or the rules are invalid.
    #[instrument(skip(self), fields(game_id = self.id))]
    pub fn config(&self) -> Result<GameConfig, DbError> {
        GameConfig::new(
            from_column("max_attempts", self.max_attempts)?,
            from_column("code_length", self.code_length)?,
            from_column("max_number", self.max_number)?,
        )
        .map_err(|e| DbError::new(format!("Game {} has invalid rules: {}", self.id, e)))
    }

    /// Decodes the stored guess history, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the JSON cannot be decoded.
    #[instrument(skip(self), fields(game_id = self.id))]
    pub fn guesses(&self) -> Result<Vec<GuessResult>, DbError> {
        Ok(serde_json::from_str(&self.guesses_json)?)
    }
}

/// Insertable row for a round that has just started.
#[derive(Debug, Clone, Insertable, new, Getters)]
#[diesel(table_name = schema::games)]
pub struct NewGameRecord {
    secret_code: String,
    max_attempts: i32,
    code_length: i32,
    max_number: i32,
    status: String,
    started_at: NaiveDateTime,
    completed_at: Option<NaiveDateTime>,
    guesses_json: String,
}

/// Columns rewritten after each guess.
///
/// `completed_at: None` clears the column rather than leaving it untouched.
#[derive(Debug, Clone, AsChangeset, new, Getters)]
#[diesel(table_name = schema::games, treat_none_as_null = true)]
pub struct GameRecordUpdate {
    status: String,
    completed_at: Option<NaiveDateTime>,
    guesses_json: String,
}

/// Lifecycle of a stored round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum StoredStatus {
    /// Still being played, or interrupted mid-round.
    #[display("in progress")]
    InProgress,
    /// The player guessed the secret.
    #[display("won")]
    Won,
    /// Attempts ran out.
    #[display("lost")]
    Lost,
    /// The player declined to resume it.
    #[display("abandoned")]
    Abandoned,
}

impl StoredStatus {
    /// Converts the status to the string stored in the database.
    #[instrument]
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::InProgress => "IN_PROGRESS",
            Self::Won => "WON",
            Self::Lost => "LOST",
            Self::Abandoned => "ABANDONED",
        }
    }

    /// Parses the status from the string stored in the database.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the string is not a known status.
    #[instrument(skip(s), fields(s = %s))]
    pub fn from_db_string(s: &str) -> Result<Self, DbError> {
        match s {
            "IN_PROGRESS" => Ok(Self::InProgress),
            "WON" => Ok(Self::Won),
            "LOST" => Ok(Self::Lost),
            "ABANDONED" => Ok(Self::Abandoned),
            _ => Err(DbError::new(format!("Invalid game status: '{}'", s))),
        }
    }
}

impl From<GameStatus> for StoredStatus {
    fn from(status: GameStatus) -> Self {
        match status {
            GameStatus::Active => Self::InProgress,
            GameStatus::Won => Self::Won,
            GameStatus::Lost => Self::Lost,
        }
    }
}

/// Converts a rules value to its integer column.
///
/// # Errors
///
/// Returns [`DbError`] if the value does not fit the column.
#[track_caller]
pub(crate) fn to_column(column: &str, value: u32) -> Result<i32, DbError> {
    i32::try_from(value)
        .map_err(|_| DbError::new(format!("{} value {} does not fit the column", column, value)))
}

#[track_caller]
fn from_column(column: &str, value: i32) -> Result<u32, DbError> {
    u32::try_from(value)
        .map_err(|_| DbError::new(format!("{} column holds negative value {}", column, value)))
}
