//! Persistent player settings loaded from TOML.

use std::path::Path;

use derive_getters::Getters;
use derive_more::{Display, Error};
use mastermind_core::GameConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Default settings file name.
pub const DEFAULT_SETTINGS_FILE: &str = "mastermind.toml";

/// random.org integer generator endpoint.
pub const DEFAULT_INTEGERS_URL: &str = "https://www.random.org/integers/";

/// random.org remaining-quota endpoint.
pub const DEFAULT_QUOTA_URL: &str = "https://www.random.org/quota/?getusage=true&format=plain";

/// Seconds to wait for random.org before falling back.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Everything read from the settings file.
///
/// ```toml
/// [game]
/// max_attempts = 10
/// code_length = 4
/// max_number = 7
///
/// [random]
/// source = "random_org"
/// timeout_secs = 10
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Rules for new rounds.
    game: GameConfig,

    /// Where secret codes come from.
    random: RandomSettings,
}

impl Settings {
    /// Creates settings from explicit parts.
    #[instrument]
    pub fn new(game: GameConfig, random: RandomSettings) -> Self {
        Self { game, random }
    }

    /// Loads settings from a TOML file.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] if the file cannot be read or parsed, or its
    /// game rules are invalid.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let content = match std::fs::read_to_string(path.as_ref()) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Settings file not found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(SettingsError::new(format!(
                    "Failed to read settings file: {}",
                    e
                )));
            }
        };

        let settings: Self = toml::from_str(&content)
            .map_err(|e| SettingsError::new(format!("Failed to parse settings: {}", e)))?;

        info!(
            max_attempts = settings.game.max_attempts(),
            code_length = settings.game.code_length(),
            max_number = settings.game.max_number(),
            source = %settings.random.source,
            "Settings loaded"
        );
        Ok(settings)
    }

    /// Writes the settings to a TOML file, replacing any existing content.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] if serialization or the write fails.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let content = self.to_toml()?;
        std::fs::write(path.as_ref(), content)
            .map_err(|e| SettingsError::new(format!("Failed to write settings file: {}", e)))?;
        info!("Settings saved");
        Ok(())
    }

    /// Renders the settings as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] if serialization fails.
    #[instrument(skip(self))]
    pub fn to_toml(&self) -> Result<String, SettingsError> {
        toml::to_string_pretty(self)
            .map_err(|e| SettingsError::new(format!("Failed to serialize settings: {}", e)))
    }

    /// Returns a copy with different game rules.
    #[instrument(skip(self))]
    pub fn with_game(&self, game: GameConfig) -> Self {
        Self {
            game,
            random: self.random.clone(),
        }
    }
}

/// Which generator draws secret codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// True random numbers from random.org, with local fallback.
    #[default]
    #[display("random.org")]
    RandomOrg,
    /// In-process pseudo-random numbers only.
    #[display("local")]
    Local,
}

/// The `[random]` table.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomSettings {
    /// Generator to use.
    source: SourceKind,
    /// Integer generator endpoint.
    api_url: String,
    /// Quota endpoint.
    quota_url: String,
    /// Request timeout in seconds.
    timeout_secs: u64,
}

impl RandomSettings {
    /// Settings that never touch the network.
    #[instrument]
    pub fn local() -> Self {
        Self {
            source: SourceKind::Local,
            ..Self::default()
        }
    }
}

impl Default for RandomSettings {
    fn default() -> Self {
        Self {
            source: SourceKind::RandomOrg,
            api_url: DEFAULT_INTEGERS_URL.to_string(),
            quota_url: DEFAULT_QUOTA_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Settings file error.
#[derive(Debug, Clone, Display, Error)]
#[display("Settings error: {} at {}:{}", message, file, line)]
pub struct SettingsError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl SettingsError {
    /// Creates a new settings error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
