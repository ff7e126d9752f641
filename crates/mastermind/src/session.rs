//! One round of play at the console.

use std::io::{BufRead, Write};

use crossterm::style::Color;
use mastermind_core::{GameConfig, GameEngine, GameState, GuessError};
use tracing::{debug, info, instrument, warn};

use crate::console::{Console, UiError, YOU_LOSE, YOU_WIN};
use crate::persistence::{GamePersistenceService, ResumedGame, now};

/// Drives rounds: prompts for guesses, prints feedback, saves progress.
#[derive(Debug)]
pub struct GameSession<'a> {
    engine: &'a GameEngine,
    persistence: &'a GamePersistenceService,
}

impl<'a> GameSession<'a> {
    /// Creates a session over an engine and a store.
    pub fn new(engine: &'a GameEngine, persistence: &'a GamePersistenceService) -> Self {
        Self {
            engine,
            persistence,
        }
    }

    /// Starts a fresh round with `config` and plays it to the end.
    ///
    /// # Errors
    ///
    /// Returns [`UiError`] if input ends or the terminal fails.
    #[instrument(skip(self, console))]
    pub fn play_new<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
        config: GameConfig,
    ) -> Result<GameState, UiError> {
        let state = self.engine.create_new_game(config);
        let game_id = match self.persistence.save_new_game(&state, now()) {
            Ok(record) => Some(*record.id()),
            Err(e) => {
                warn!(error = %e, "Could not store new game, continuing unsaved");
                console.say("Warning: this game will not be saved.")?;
                None
            }
        };
        info!(game_id = ?game_id, "Round started");

        console.blank()?;
        console.say(format!(
            "I'm thinking of {} numbers, each from 0 to {}. You have {} attempts to guess them.",
            config.code_length(),
            config.max_number(),
            config.max_attempts(),
        ))?;
        self.play(console, state, game_id)
    }

    /// Continues an interrupted round and plays it to the end.
    ///
    /// # Errors
    ///
    /// Returns [`UiError`] if input ends or the terminal fails.
    #[instrument(skip(self, console, resumed), fields(game_id = resumed.game_id()))]
    pub fn resume<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
        resumed: ResumedGame,
    ) -> Result<GameState, UiError> {
        let (game_id, state) = resumed.into_parts();

        console.blank()?;
        console.say(format!(
            "Resuming game: {} numbers from 0 to {}.",
            state.code_length(),
            state.max_number(),
        ))?;
        for (n, result) in state.history().iter().enumerate() {
            console.say(format!("  {}. {}  {}", n + 1, result.guess_text(), result.feedback()))?;
        }
        self.play(console, state, Some(game_id))
    }

    /// Prompts until the round ends, then announces the outcome.
    #[instrument(skip(self, console, state))]
    fn play<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
        mut state: GameState,
        game_id: Option<i32>,
    ) -> Result<GameState, UiError> {
        while !state.is_game_ended() {
            console.say(format!("Attempts remaining: {}", state.attempts_remaining()))?;
            let raw = console.read_line("Enter your guess: ")?;

            state = match self.engine.process_guess(&state, &raw) {
                Ok(next) => next,
                Err(GuessError::InvalidInput(message)) => {
                    console.say(message)?;
                    continue;
                }
                Err(e @ GuessError::InvalidState(_)) => {
                    warn!(error = %e, "Round loop reached an ended state");
                    break;
                }
            };

            if let Some(result) = state.last_result() {
                console.say(result.feedback())?;
            }
            self.save_progress(&state, game_id);
        }

        self.announce(console, &state)?;
        Ok(state)
    }

    fn save_progress(&self, state: &GameState, game_id: Option<i32>) {
        let Some(id) = game_id else {
            return;
        };
        match self.persistence.update_game(state, id) {
            Ok(_) => debug!(game_id = id, "Progress saved"),
            Err(e) => warn!(game_id = id, error = %e, "Could not save progress"),
        }
    }

    fn announce<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
        state: &GameState,
    ) -> Result<(), UiError> {
        console.blank()?;
        if state.has_player_won() {
            console.say_colored(YOU_WIN, Color::Green)?;
            console.say(format!(
                "You cracked the code in {} attempt{}.",
                state.attempts_made(),
                if state.attempts_made() == 1 { "" } else { "s" },
            ))?;
        } else {
            console.say_colored(YOU_LOSE, Color::Red)?;
            console.say("You ran out of attempts.")?;
        }
        console.say(format!("The secret code was: {}", state.secret_code()))?;
        Ok(())
    }
}
