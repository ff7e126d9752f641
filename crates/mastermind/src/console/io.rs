//! Line-oriented terminal I/O.

use std::fmt::Display;
use std::io::{BufRead, Write};

use crossterm::style::{Color, Stylize};
use derive_more::{Display, From};
use tracing::{debug, instrument};

use crate::db::DbError;
use crate::settings::SettingsError;

/// Printed when input ends at a prompt.
pub const INPUT_CLOSED_MESSAGE: &str = "Input stream closed. Game will exit now.";

/// Errors that end an interactive session.
#[derive(Debug, Display, From)]
pub enum UiError {
    /// Input ended (Ctrl+D or a closed pipe).
    #[display("input stream closed")]
    #[from(ignore)]
    Terminated,

    /// Reading or writing the terminal failed.
    #[display("terminal I/O failed: {_0}")]
    Io(std::io::Error),

    /// Storing or loading games failed.
    #[display("{_0}")]
    Db(DbError),

    /// Saving settings failed.
    #[display("{_0}")]
    Settings(SettingsError),
}

impl std::error::Error for UiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Terminated => None,
            Self::Io(e) => Some(e),
            Self::Db(e) => Some(e),
            Self::Settings(e) => Some(e),
        }
    }
}

/// Prompting reader/writer pair.
///
/// Generic over its streams so sessions can be scripted with in-memory
/// buffers.
#[derive(Debug)]
pub struct Console<R, W> {
    input: R,
    output: W,
    styled: bool,
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// Creates a console that colors banners and results.
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            styled: true,
        }
    }

    /// Creates a console that writes plain text only.
    pub fn plain(input: R, output: W) -> Self {
        Self {
            input,
            output,
            styled: false,
        }
    }

    /// Writes one line.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::Io`] if the write fails.
    #[instrument(skip(self, text))]
    pub fn say(&mut self, text: impl Display) -> Result<(), UiError> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    /// Writes an empty line.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::Io`] if the write fails.
    #[instrument(skip(self))]
    pub fn blank(&mut self) -> Result<(), UiError> {
        writeln!(self.output)?;
        Ok(())
    }

    /// Writes one line in `color`, or plain when styling is off.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::Io`] if the write fails.
    #[instrument(skip(self))]
    pub fn say_colored(&mut self, text: &str, color: Color) -> Result<(), UiError> {
        if self.styled {
            writeln!(self.output, "{}", text.with(color).bold())?;
        } else {
            writeln!(self.output, "{}", text)?;
        }
        Ok(())
    }

    /// Shows `prompt` and reads one line without its line ending.
    ///
    /// Bytes that are not valid UTF-8 are decoded as replacement characters.
    ///
    /// # Errors
    ///
    /// - [`UiError::Terminated`] if input has ended.
    /// - [`UiError::Io`] if reading or writing fails.
    #[instrument(skip(self))]
    pub fn read_line(&mut self, prompt: &str) -> Result<String, UiError> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut bytes = Vec::new();
        if self.input.read_until(b'\n', &mut bytes)? == 0 {
            writeln!(self.output)?;
            writeln!(self.output, "{}", INPUT_CLOSED_MESSAGE)?;
            self.output.flush()?;
            debug!("Input closed");
            return Err(UiError::Terminated);
        }

        let line = String::from_utf8_lossy(&bytes);
        let trimmed = line.trim_end_matches(['\r', '\n']).to_string();
        debug!(input = %trimmed, "Line read");
        Ok(trimmed)
    }

    /// Reads an integer in `min..=max`, re-prompting until one arrives.
    ///
    /// # Errors
    ///
    /// - [`UiError::Terminated`] if input has ended.
    /// - [`UiError::Io`] if reading or writing fails.
    #[instrument(skip(self))]
    pub fn read_number_in_range(&mut self, prompt: &str, min: u32, max: u32) -> Result<u32, UiError> {
        loop {
            let line = self.read_line(prompt)?;
            match line.trim().parse::<u32>() {
                Ok(n) if (min..=max).contains(&n) => return Ok(n),
                _ => self.say(format!("Please enter a number between {} and {}.", min, max))?,
            }
        }
    }

    /// Reads a line and reports whether it starts with `y`.
    ///
    /// # Errors
    ///
    /// - [`UiError::Terminated`] if input has ended.
    /// - [`UiError::Io`] if reading or writing fails.
    #[instrument(skip(self))]
    pub fn confirm(&mut self, prompt: &str) -> Result<bool, UiError> {
        let answer = self.read_line(prompt)?;
        Ok(answer.trim().to_ascii_lowercase().starts_with('y'))
    }
}
