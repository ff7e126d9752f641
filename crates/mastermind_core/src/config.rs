//! Game rules: attempts, code length, and digit range.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Default number of guesses per round.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;
/// Default number of digits in the secret code.
pub const DEFAULT_CODE_LENGTH: u32 = 4;
/// Default highest digit value (digits range over `0..=max_number`).
pub const DEFAULT_MAX_NUMBER: u32 = 7;

/// Immutable rules for one game.
///
/// Always valid: both `max_attempts` and `code_length` are positive.
/// Updates return a new value rather than mutating in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawGameConfig", into = "RawGameConfig")]
pub struct GameConfig {
    max_attempts: u32,
    code_length: u32,
    max_number: u32,
}

impl GameConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GameConfigError`] if `max_attempts` or `code_length` is zero.
    #[instrument]
    pub fn new(max_attempts: u32, code_length: u32, max_number: u32) -> Result<Self, GameConfigError> {
        if max_attempts == 0 {
            return Err(GameConfigError::ZeroAttempts);
        }
        if code_length == 0 {
            return Err(GameConfigError::ZeroCodeLength);
        }
        Ok(Self {
            max_attempts,
            code_length,
            max_number,
        })
    }

    /// Returns the standard rules: 10 attempts, 4 digits, values 0 to 7.
    pub fn defaults() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            code_length: DEFAULT_CODE_LENGTH,
            max_number: DEFAULT_MAX_NUMBER,
        }
    }

    /// Number of guesses allowed per round.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Number of digits in the secret code.
    pub fn code_length(&self) -> u32 {
        self.code_length
    }

    /// Highest allowed digit value.
    pub fn max_number(&self) -> u32 {
        self.max_number
    }

    /// Returns a copy with a different attempt limit.
    ///
    /// # Errors
    ///
    /// Returns [`GameConfigError::ZeroAttempts`] if `max_attempts` is zero.
    #[instrument(skip(self))]
    pub fn with_max_attempts(&self, max_attempts: u32) -> Result<Self, GameConfigError> {
        Self::new(max_attempts, self.code_length, self.max_number)
    }

    /// Returns a copy with a different code length.
    ///
    /// # Errors
    ///
    /// Returns [`GameConfigError::ZeroCodeLength`] if `code_length` is zero.
    #[instrument(skip(self))]
    pub fn with_code_length(&self, code_length: u32) -> Result<Self, GameConfigError> {
        Self::new(self.max_attempts, code_length, self.max_number)
    }

    /// Returns a copy with a different digit range.
    #[instrument(skip(self))]
    pub fn with_max_number(&self, max_number: u32) -> Self {
        Self {
            max_number,
            ..*self
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::defaults()
    }
}

/// Unchecked mirror of [`GameConfig`] used only for (de)serialization.
///
/// Missing fields take the standard values.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
struct RawGameConfig {
    max_attempts: u32,
    code_length: u32,
    max_number: u32,
}

impl Default for RawGameConfig {
    fn default() -> Self {
        GameConfig::defaults().into()
    }
}

impl TryFrom<RawGameConfig> for GameConfig {
    type Error = GameConfigError;

    fn try_from(raw: RawGameConfig) -> Result<Self, Self::Error> {
        Self::new(raw.max_attempts, raw.code_length, raw.max_number)
    }
}

impl From<GameConfig> for RawGameConfig {
    fn from(config: GameConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            code_length: config.code_length,
            max_number: config.max_number,
        }
    }
}

/// Rejected game rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum GameConfigError {
    /// `max_attempts` was zero.
    #[display("max attempts must be positive")]
    ZeroAttempts,
    /// `code_length` was zero.
    #[display("code length must be positive")]
    ZeroCodeLength,
}

impl std::error::Error for GameConfigError {}
