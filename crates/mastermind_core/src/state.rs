//! Immutable game state and its single transition.
//!
//! A [`GameState`] is never mutated: [`GameState::with_guess`] borrows the
//! current value and returns the next one, so any earlier state (for
//! example one rebuilt from persisted history) stays valid.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::config::GameConfig;
use crate::score::{GuessResult, score};
use crate::validator::{ValidationError, format_code, validate};

// ─────────────────────────────────────────────────────────────
//  Secret
// ─────────────────────────────────────────────────────────────

/// A secret code that conforms to the configuration it was built for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Secret {
    digits: Vec<u32>,
    text: String,
}

impl Secret {
    /// Parses and validates secret text against `config`.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] that made the text unusable.
    #[instrument(level = "debug", skip(text))]
    pub fn parse(text: &str, config: &GameConfig) -> Result<Self, ValidationError> {
        let digits = validate(text, config.code_length() as usize, config.max_number())?;
        Ok(Self::from_trusted(digits))
    }

    /// Wraps digits already known to conform to the configuration.
    pub(crate) fn from_trusted(digits: Vec<u32>) -> Self {
        let text = format_code(&digits);
        Self { digits, text }
    }

    /// Digits in order.
    pub fn digits(&self) -> &[u32] {
        &self.digits
    }

    /// Canonical space-separated text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

// ─────────────────────────────────────────────────────────────
//  Status and errors
// ─────────────────────────────────────────────────────────────

/// Where a game stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum GameStatus {
    /// Guesses may still be submitted.
    #[display("active")]
    Active,
    /// The secret was guessed.
    #[display("won")]
    Won,
    /// Attempts ran out.
    #[display("lost")]
    Lost,
}

impl GameStatus {
    /// True for [`GameStatus::Won`] and [`GameStatus::Lost`].
    pub fn is_ended(self) -> bool {
        !matches!(self, Self::Active)
    }
}

/// Errors from building or advancing a [`GameState`].
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum StateError {
    /// The secret does not conform to the configuration.
    #[display("Invalid secret code: {_0}")]
    InvalidSecret(ValidationError),

    /// A guess was submitted after the game ended.
    #[display("game already ended ({_0})")]
    GameEnded(GameStatus),

    /// The guess has the wrong number of digits.
    #[display("guess has {actual} digits, expected {expected}")]
    GuessLength {
        /// Digits required.
        expected: usize,
        /// Digits supplied.
        actual: usize,
    },
}

impl std::error::Error for StateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidSecret(e) => Some(e),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────
//  GameState
// ─────────────────────────────────────────────────────────────

/// Secret, guess history, and attempt bookkeeping for one round.
///
/// Invariants:
/// - `history.len() == max_attempts - attempts_remaining`
/// - the game has ended iff it was won or no attempts remain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    secret: Secret,
    history: Vec<GuessResult>,
    attempts_remaining: u32,
    config: GameConfig,
    game_ended: bool,
    player_won: bool,
}

impl GameState {
    /// Starts a round from secret text.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::InvalidSecret`] if the text is not a valid code
    /// for `config`.
    #[instrument(skip(secret_text))]
    pub fn create_new(secret_text: &str, config: GameConfig) -> Result<Self, StateError> {
        let secret = Secret::parse(secret_text, &config).map_err(|e| {
            warn!(error = %e, "Rejected secret code");
            StateError::InvalidSecret(e)
        })?;
        Ok(Self::start(secret, config))
    }

    /// Starts a round from a secret already validated for `config`.
    pub(crate) fn start(secret: Secret, config: GameConfig) -> Self {
        debug!(
            max_attempts = config.max_attempts(),
            code_length = config.code_length(),
            max_number = config.max_number(),
            "New game state"
        );
        Self {
            secret,
            history: Vec::new(),
            attempts_remaining: config.max_attempts(),
            config,
            game_ended: false,
            player_won: false,
        }
    }

    /// Scores one guess and returns the next state.
    ///
    /// The guess must already be range-checked (see [`crate::validate`]);
    /// only its length is checked here.
    ///
    /// # Errors
    ///
    /// - [`StateError::GameEnded`] if the game is over.
    /// - [`StateError::GuessLength`] if the guess has the wrong length.
    #[instrument(skip(self, guess), fields(attempts_remaining = self.attempts_remaining))]
    pub fn with_guess(&self, guess: &[u32]) -> Result<Self, StateError> {
        if self.game_ended {
            warn!(status = %self.status(), "Guess submitted to ended game");
            return Err(StateError::GameEnded(self.status()));
        }
        if guess.len() != self.secret.digits.len() {
            return Err(StateError::GuessLength {
                expected: self.secret.digits.len(),
                actual: guess.len(),
            });
        }

        let result = score(&self.secret.digits, guess, self.config.max_number());
        debug!(
            exact_matches = result.exact_matches(),
            value_matches = result.value_matches(),
            "Guess scored"
        );

        let attempts_remaining = self.attempts_remaining - 1;
        let player_won = *result.is_win();
        let game_ended = player_won || attempts_remaining == 0;

        let mut history = self.history.clone();
        history.push(result);

        if game_ended {
            info!(player_won, attempts_made = history.len(), "Game ended");
        }

        Ok(Self {
            secret: self.secret.clone(),
            history,
            attempts_remaining,
            config: self.config,
            game_ended,
            player_won,
        })
    }

    /// Rebuilds a state by replaying guesses from a fresh round.
    ///
    /// # Errors
    ///
    /// Returns the first [`StateError`] raised while creating the round or
    /// applying a guess.
    #[instrument(skip(secret_text, guesses), fields(guesses = guesses.len()))]
    pub fn replay(
        secret_text: &str,
        config: GameConfig,
        guesses: &[Vec<u32>],
    ) -> Result<Self, StateError> {
        guesses
            .iter()
            .try_fold(Self::create_new(secret_text, config)?, |state, guess| {
                state.with_guess(guess)
            })
    }

    /// Guesses left before the round is lost.
    pub fn attempts_remaining(&self) -> u32 {
        self.attempts_remaining
    }

    /// Guesses accepted so far.
    pub fn attempts_made(&self) -> u32 {
        self.config.max_attempts() - self.attempts_remaining
    }

    /// Scored guesses in the order they were made.
    pub fn history(&self) -> &[GuessResult] {
        &self.history
    }

    /// Most recent scored guess, if any.
    pub fn last_result(&self) -> Option<&GuessResult> {
        self.history.last()
    }

    /// True once the round is won or out of attempts.
    pub fn is_game_ended(&self) -> bool {
        self.game_ended
    }

    /// True if the secret was guessed.
    pub fn has_player_won(&self) -> bool {
        self.player_won
    }

    /// Current status derived from the terminal flags.
    pub fn status(&self) -> GameStatus {
        match (self.game_ended, self.player_won) {
            (false, _) => GameStatus::Active,
            (true, true) => GameStatus::Won,
            (true, false) => GameStatus::Lost,
        }
    }

    /// Secret code text, for the end-of-round reveal.
    pub fn secret_code(&self) -> &str {
        self.secret.text()
    }

    /// Secret code digits.
    pub fn secret_digits(&self) -> &[u32] {
        self.secret.digits()
    }

    /// Rules this round was created with.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Attempt limit for this round.
    pub fn max_attempts(&self) -> u32 {
        self.config.max_attempts()
    }

    /// Digits per code for this round.
    pub fn code_length(&self) -> u32 {
        self.config.code_length()
    }

    /// Highest digit value for this round.
    pub fn max_number(&self) -> u32 {
        self.config.max_number()
    }
}
