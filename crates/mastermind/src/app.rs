//! Menu controller: the loop behind the main, options, and history menus.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use crossterm::style::Color;
use mastermind_core::{GameConfig, GameConfigError, GameEngine};
use tracing::{info, instrument, warn};

use crate::console::{
    Console, FAREWELL, MainMenuChoice, OptionsChoice, ResumeChoice, RoundEndChoice, TITLE, UiError,
    choose, format_game_record,
};
use crate::persistence::GamePersistenceService;
use crate::random_org::QuotaChecker;
use crate::session::GameSession;
use crate::settings::Settings;

/// Lowest value accepted for any rule in the options menu.
pub const OPTION_MIN: u32 = 1;
/// Highest value accepted for any rule in the options menu.
pub const OPTION_MAX: u32 = 100;

/// Owns the console and services for one interactive run.
///
/// Call [`MenuController::run`] to show the main menu.
#[derive(Debug)]
pub struct MenuController<R, W> {
    console: Console<R, W>,
    engine: GameEngine,
    persistence: GamePersistenceService,
    settings: Settings,
    settings_path: PathBuf,
    quota: Option<QuotaChecker>,
}

impl<R: BufRead, W: Write> MenuController<R, W> {
    /// Creates a controller; rule changes are written to `settings_path`.
    #[instrument(skip(console, engine, persistence, settings))]
    pub fn new(
        console: Console<R, W>,
        engine: GameEngine,
        persistence: GamePersistenceService,
        settings: Settings,
        settings_path: PathBuf,
    ) -> Self {
        info!("Creating MenuController");
        Self {
            console,
            engine,
            persistence,
            settings,
            settings_path,
            quota: None,
        }
    }

    /// Enables the quota entry of the options menu.
    #[instrument(skip(self, quota))]
    pub fn with_quota_checker(mut self, quota: QuotaChecker) -> Self {
        self.quota = Some(quota);
        self
    }

    /// Settings in effect for this run.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Runs until the player quits or input ends.
    ///
    /// # Errors
    ///
    /// Returns [`UiError`] for terminal failures; end of input is a normal
    /// exit.
    #[instrument(skip(self))]
    pub fn run(&mut self) -> Result<(), UiError> {
        match self.main_loop() {
            Err(UiError::Terminated) => {
                info!("Input closed, exiting");
                Ok(())
            }
            other => other,
        }
    }

    fn main_loop(&mut self) -> Result<(), UiError> {
        self.console.say_colored(TITLE, Color::Cyan)?;
        loop {
            match choose::<MainMenuChoice, _, _>(&mut self.console, "Main Menu")? {
                MainMenuChoice::StartGame => self.start_game()?,
                MainMenuChoice::Options => self.options_menu()?,
                MainMenuChoice::History => self.show_history()?,
                MainMenuChoice::About => self.show_about()?,
                MainMenuChoice::Quit => {
                    self.console.blank()?;
                    self.console.say(FAREWELL)?;
                    info!("Player quit");
                    return Ok(());
                }
            }
        }
    }

    /// Offers to resume an interrupted round, then plays until the player
    /// returns to the main menu.
    #[instrument(skip(self))]
    fn start_game(&mut self) -> Result<(), UiError> {
        let session = GameSession::new(&self.engine, &self.persistence);

        let resumable = match self.persistence.last_incomplete_game() {
            Ok(resumable) => resumable,
            Err(e) => {
                warn!(error = %e, "Stored game cannot be resumed, abandoning it");
                if let Err(e) = self.persistence.mark_last_game_abandoned() {
                    warn!(error = %e, "Could not abandon stored game");
                }
                None
            }
        };

        let mut config = *self.settings.game();
        if let Some(resumed) = resumable {
            self.console.blank()?;
            self.console.say(format!(
                "You have an unfinished game started {}.",
                resumed.started_at().format("%Y-%m-%d %H:%M:%S")
            ))?;
            match choose::<ResumeChoice, _, _>(&mut self.console, "Unfinished Game")? {
                ResumeChoice::Resume => {
                    config = *resumed.state().config();
                    session.resume(&mut self.console, resumed)?;
                    if !play_again(&mut self.console)? {
                        return Ok(());
                    }
                }
                ResumeChoice::Abandon => {
                    self.persistence.mark_last_game_abandoned()?;
                    self.console.say("Previous game abandoned.")?;
                }
            }
        }

        loop {
            session.play_new(&mut self.console, config)?;
            if !play_again(&mut self.console)? {
                return Ok(());
            }
        }
    }

    #[instrument(skip(self))]
    fn options_menu(&mut self) -> Result<(), UiError> {
        loop {
            let game = *self.settings.game();
            self.console.blank()?;
            self.console.say(format!(
                "Current rules: {} attempts, {} numbers from 0 to {}.",
                game.max_attempts(),
                game.code_length(),
                game.max_number(),
            ))?;

            match choose::<OptionsChoice, _, _>(&mut self.console, "Options")? {
                OptionsChoice::MaxAttempts => {
                    let value = self.read_option("Number of attempts")?;
                    self.apply_rules(game.with_max_attempts(value))?;
                }
                OptionsChoice::CodeLength => {
                    let value = self.read_option("Code length")?;
                    self.apply_rules(game.with_code_length(value))?;
                }
                OptionsChoice::MaxNumber => {
                    let value = self.read_option("Maximum number")?;
                    self.apply_rules(Ok(game.with_max_number(value)))?;
                }
                OptionsChoice::Quota => self.show_quota()?,
                OptionsChoice::ResetDefaults => {
                    self.apply_rules(Ok(GameConfig::defaults()))?;
                }
                OptionsChoice::ClearHistory => self.clear_history()?,
                OptionsChoice::Back => return Ok(()),
            }
        }
    }

    #[instrument(skip(self))]
    fn read_option(&mut self, label: &str) -> Result<u32, UiError> {
        self.console.read_number_in_range(
            &format!("{} ({}-{}): ", label, OPTION_MIN, OPTION_MAX),
            OPTION_MIN,
            OPTION_MAX,
        )
    }

    /// Stores new rules in memory and on disk.
    #[instrument(skip(self))]
    fn apply_rules(&mut self, rules: Result<GameConfig, GameConfigError>) -> Result<(), UiError> {
        let game = match rules {
            Ok(game) => game,
            Err(e) => {
                self.console.say(format!("Invalid setting: {}", e))?;
                return Ok(());
            }
        };

        self.settings = self.settings.with_game(game);
        match self.settings.save(&self.settings_path) {
            Ok(()) => self.console.say("Settings saved.")?,
            Err(e) => {
                warn!(error = %e, "Could not save settings");
                self.console
                    .say("Settings updated for this session but could not be saved.")?;
            }
        }
        Ok(())
    }

    #[instrument(skip(self))]
    fn show_quota(&mut self) -> Result<(), UiError> {
        let Some(quota) = &self.quota else {
            self.console
                .say("Quota check is unavailable with the local random source.")?;
            return Ok(());
        };

        match quota.remaining_bits() {
            Ok(bits) if bits > 0 => self
                .console
                .say(format!("random.org quota remaining: {} bits.", bits))?,
            Ok(bits) => self.console.say(format!(
                "random.org quota exhausted ({} bits). New games will use the local generator.",
                bits
            ))?,
            Err(e) => {
                warn!(error = %e, "Quota check failed");
                self.console.say("Could not reach random.org to check the quota.")?;
            }
        }
        Ok(())
    }

    #[instrument(skip(self))]
    fn clear_history(&mut self) -> Result<(), UiError> {
        if !self
            .console
            .confirm("Delete every stored game? (y/n): ")?
        {
            self.console.say("History kept.")?;
            return Ok(());
        }
        let deleted = self.persistence.clear_all_games()?;
        self.console.say(format!("Deleted {} games.", deleted))?;
        Ok(())
    }

    #[instrument(skip(self))]
    fn show_history(&mut self) -> Result<(), UiError> {
        let games = self.persistence.all_games()?;
        self.console.blank()?;
        if games.is_empty() {
            self.console.say("No games played yet.")?;
            return Ok(());
        }
        self.console.say("=== Game History ===")?;
        for game in &games {
            self.console.say(format_game_record(game))?;
        }
        Ok(())
    }

    #[instrument(skip(self))]
    fn show_about(&mut self) -> Result<(), UiError> {
        let game = *self.settings.game();
        self.console.blank()?;
        self.console.say("=== About ===")?;
        self.console.say(format!(
            "The computer picks a secret code of {} numbers, each from 0 to {}. \
             Numbers may repeat.",
            game.code_length(),
            game.max_number(),
        ))?;
        self.console.say(format!(
            "You have {} attempts to guess it. Enter each guess as numbers separated by spaces, \
             for example: {}",
            game.max_attempts(),
            example_guess(game.code_length(), game.max_number()),
        ))?;
        self.console.say(
            "After each guess you learn how many numbers are correct and how many are in the \
             correct location.",
        )?;
        Ok(())
    }
}

#[instrument(skip(console))]
fn play_again<R: BufRead, W: Write>(console: &mut Console<R, W>) -> Result<bool, UiError> {
    let choice = choose::<RoundEndChoice, _, _>(console, "What next?")?;
    Ok(choice == RoundEndChoice::PlayAgain)
}

fn example_guess(code_length: u32, max_number: u32) -> String {
    (0..code_length)
        .map(|i| (i % max_number.saturating_add(1)).to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
