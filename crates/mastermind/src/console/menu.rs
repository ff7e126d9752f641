//! Numbered menus.

use std::fmt::Display;
use std::io::{BufRead, Write};

use derive_more::Display;
use strum::{EnumIter, IntoEnumIterator};
use tracing::{debug, instrument};

use crate::console::{Console, UiError};

/// Top-level menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Display)]
pub enum MainMenuChoice {
    /// Start a round, or resume the interrupted one.
    #[display("Start new game")]
    StartGame,
    /// Change rules and manage history.
    #[display("Options")]
    Options,
    /// List stored games.
    #[display("Game history")]
    History,
    /// Show the rules.
    #[display("About")]
    About,
    /// Leave the application.
    #[display("Quit")]
    Quit,
}

/// Offered when the newest stored game is unfinished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Display)]
pub enum ResumeChoice {
    /// Continue the interrupted round.
    #[display("Resume previous game")]
    Resume,
    /// Abandon it and start fresh.
    #[display("Abandon it and start a new game")]
    Abandon,
}

/// Shown after a round ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Display)]
pub enum RoundEndChoice {
    /// Another round with the same rules.
    #[display("Play again")]
    PlayAgain,
    /// Back to the top-level menu.
    #[display("Main menu")]
    MainMenu,
}

/// Options menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Display)]
pub enum OptionsChoice {
    /// Change the attempt limit.
    #[display("Change number of attempts")]
    MaxAttempts,
    /// Change the code length.
    #[display("Change code length")]
    CodeLength,
    /// Change the highest digit value.
    #[display("Change maximum number")]
    MaxNumber,
    /// Ask random.org how much quota remains.
    #[display("Check random.org quota")]
    Quota,
    /// Restore the standard rules.
    #[display("Reset to defaults")]
    ResetDefaults,
    /// Delete every stored game.
    #[display("Clear game history")]
    ClearHistory,
    /// Back to the top-level menu.
    #[display("Back")]
    Back,
}

/// Prints every variant of `T` numbered from 1 and reads a selection.
///
/// # Errors
///
/// - [`UiError::Terminated`] if input has ended.
/// - [`UiError::Io`] if reading or writing fails.
#[instrument(skip(console))]
pub fn choose<T, R, W>(console: &mut Console<R, W>, title: &str) -> Result<T, UiError>
where
    T: IntoEnumIterator + Display + Copy + std::fmt::Debug,
    R: BufRead,
    W: Write,
{
    let options: Vec<T> = T::iter().collect();

    console.blank()?;
    console.say(format!("=== {} ===", title))?;
    for (i, option) in options.iter().enumerate() {
        console.say(format!("{}. {}", i + 1, option))?;
    }

    let picked = console.read_number_in_range("Select an option: ", 1, options.len() as u32)?;
    let choice = options[picked as usize - 1];
    debug!(choice = ?choice, "Menu choice");
    Ok(choice)
}
