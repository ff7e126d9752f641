//! Round orchestration: secret acquisition and turn processing.

use derive_more::Display;
use tracing::{debug, info, instrument, warn};

use crate::config::GameConfig;
use crate::random::{LocalRandom, RandomSource};
use crate::state::{GameState, GameStatus, Secret, StateError};
use crate::validator::validate;

/// Why a raw guess was not applied.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum GuessError {
    /// The game has already ended; the caller sequenced turns wrongly.
    #[display("Cannot process guess: game already {_0}")]
    InvalidState(GameStatus),

    /// The text was not a valid guess; the player should retry.
    #[display("{_0}")]
    InvalidInput(String),
}

impl std::error::Error for GuessError {}

/// Creates rounds and applies player guesses.
///
/// Secrets come from the configured [`RandomSource`]; when it fails or
/// returns something unusable the engine silently draws from a local
/// generator instead.
#[derive(Debug)]
pub struct GameEngine {
    source: Box<dyn RandomSource>,
    fallback: LocalRandom,
}

impl GameEngine {
    /// Creates an engine drawing secrets from `source`.
    #[instrument(skip(source), fields(source = source.name()))]
    pub fn new(source: impl RandomSource + 'static) -> Self {
        Self::with_fallback(source, LocalRandom::new())
    }

    /// Creates an engine with an explicit fallback generator.
    #[instrument(skip(source, fallback), fields(source = source.name()))]
    pub fn with_fallback(source: impl RandomSource + 'static, fallback: LocalRandom) -> Self {
        info!("Creating GameEngine");
        Self {
            source: Box::new(source),
            fallback,
        }
    }

    /// Starts a new round with a fresh secret.
    #[instrument(skip(self), fields(source = self.source.name()))]
    pub fn create_new_game(&self, config: GameConfig) -> GameState {
        let secret = self.draw_secret(&config);
        GameState::start(secret, config)
    }

    /// Validates `raw_guess` and applies it to `state`.
    ///
    /// On error `state` is untouched and no attempt is consumed.
    ///
    /// # Errors
    ///
    /// - [`GuessError::InvalidState`] if the game has ended.
    /// - [`GuessError::InvalidInput`] if the text is not a valid guess.
    #[instrument(skip(self, state), fields(attempts_remaining = state.attempts_remaining()))]
    pub fn process_guess(&self, state: &GameState, raw_guess: &str) -> Result<GameState, GuessError> {
        if state.is_game_ended() {
            warn!(status = %state.status(), "Guess submitted to ended game");
            return Err(GuessError::InvalidState(state.status()));
        }

        let guess = validate(raw_guess, state.code_length() as usize, state.max_number())
            .map_err(|e| {
                debug!(error = %e, "Invalid guess input");
                GuessError::InvalidInput(e.to_string())
            })?;

        state.with_guess(&guess).map_err(|e| match e {
            StateError::GameEnded(status) => GuessError::InvalidState(status),
            other => GuessError::InvalidInput(other.to_string()),
        })
    }

    /// Returns true if `raw_guess` would be accepted by `state`.
    #[instrument(skip(self, state))]
    pub fn is_valid_guess(&self, state: &GameState, raw_guess: &str) -> bool {
        validate(raw_guess, state.code_length() as usize, state.max_number()).is_ok()
    }

    fn draw_secret(&self, config: &GameConfig) -> Secret {
        let drawn = self
            .source
            .generate(config.code_length(), 0, i64::from(config.max_number()));

        match drawn {
            Ok(text) => match Secret::parse(&text, config) {
                Ok(secret) => {
                    debug!(source = self.source.name(), "Secret drawn from primary source");
                    return secret;
                }
                Err(e) => warn!(
                    source = self.source.name(),
                    error = %e,
                    "Primary source returned unusable secret, falling back to local generator"
                ),
            },
            Err(e) => warn!(
                source = self.source.name(),
                error = %e,
                "Primary source failed, falling back to local generator"
            ),
        }

        self.fallback.secret_for(config)
    }
}
