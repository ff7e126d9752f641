//! Parsing untrusted guess text into a bounded digit sequence.

use derive_more::Display;
use tracing::{debug, instrument};

/// Why a piece of text is not a valid code.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ValidationError {
    /// Input was empty or only whitespace.
    #[display("Please enter your guess.")]
    EmptyInput,

    /// Input had the wrong number of tokens.
    #[display("Guess must consist of {expected} numbers.")]
    WrongLength {
        /// Number of digits required.
        expected: usize,
        /// Number of tokens found.
        actual: usize,
    },

    /// A token was not a base-10 integer.
    #[display("'{_0}' is not a valid number.")]
    NotANumber(String),

    /// A parsed value fell outside `0..=max`.
    #[display("Numbers must be between 0 and {max}.")]
    OutOfRange {
        /// The offending value.
        value: i64,
        /// Highest allowed value.
        max: u32,
    },
}

impl std::error::Error for ValidationError {}

/// Validates `raw` as exactly `expected_length` integers in `0..=max_value`.
///
/// Tokens are separated by one or more whitespace characters; surrounding
/// whitespace is ignored. Tokens are checked left to right and the first
/// bad one decides the error.
///
/// # Errors
///
/// Returns the first [`ValidationError`] encountered.
#[instrument(level = "debug")]
pub fn validate(raw: &str, expected_length: usize, max_value: u32) -> Result<Vec<u32>, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        debug!("Empty input");
        return Err(ValidationError::EmptyInput);
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    if tokens.len() != expected_length {
        debug!(actual = tokens.len(), "Wrong token count");
        return Err(ValidationError::WrongLength {
            expected: expected_length,
            actual: tokens.len(),
        });
    }

    let mut values = Vec::with_capacity(expected_length);
    for token in tokens {
        let value: i64 = token
            .parse()
            .map_err(|_| ValidationError::NotANumber(token.to_string()))?;
        match u32::try_from(value) {
            Ok(digit) if digit <= max_value => values.push(digit),
            _ => {
                return Err(ValidationError::OutOfRange {
                    value,
                    max: max_value,
                });
            }
        }
    }

    Ok(values)
}

/// Renders values as space-separated decimal tokens.
///
/// An empty slice renders as an empty string.
#[instrument(level = "debug")]
pub fn format_code(values: &[u32]) -> String {
    values
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
