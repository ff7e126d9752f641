//! Peg scoring: exact matches and value matches with multiset semantics.

use std::collections::HashMap;

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::validator::format_code;

/// Largest `max_number` still tallied in a dense array.
///
/// Above this the tally switches to a sparse map; results are identical.
pub const DENSE_TABLE_LIMIT: u32 = 1024;

/// One scored turn.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct GuessResult {
    /// Canonical text of the submitted guess.
    guess_text: String,
    /// Positions where guess and secret agree.
    exact_matches: u32,
    /// Values shared regardless of position, exact matches included.
    value_matches: u32,
    /// True iff every position matched.
    is_win: bool,
}

impl GuessResult {
    /// Human-readable feedback for this guess.
    pub fn feedback(&self) -> String {
        if self.is_win {
            return "You guessed all the numbers correctly!".to_string();
        }
        if self.value_matches == 0 {
            return "All incorrect.".to_string();
        }
        format!(
            "{} correct number{} and {} correct location{}.",
            self.value_matches,
            plural(self.value_matches),
            self.exact_matches,
            plural(self.exact_matches),
        )
    }
}

fn plural(count: u32) -> &'static str {
    if count == 1 { "" } else { "s" }
}

/// Scores `guess` against `secret`.
///
/// Both slices must have the same length and hold values in
/// `0..=max_number`; callers validate first.
#[instrument(level = "debug", skip(secret, guess), fields(len = secret.len()))]
pub fn score(secret: &[u32], guess: &[u32], max_number: u32) -> GuessResult {
    debug_assert_eq!(secret.len(), guess.len(), "secret and guess lengths differ");

    let exact = secret
        .iter()
        .zip(guess)
        .filter(|(s, g)| s == g)
        .count() as u32;

    let mut secret_freq = FrequencyTable::for_range(max_number);
    let mut guess_freq = FrequencyTable::for_range(max_number);
    for (&s, &g) in secret.iter().zip(guess) {
        if s != g {
            secret_freq.add(s);
            guess_freq.add(g);
        }
    }
    let misplaced = secret_freq.overlap(&guess_freq);

    GuessResult {
        guess_text: format_code(guess),
        exact_matches: exact,
        value_matches: exact + misplaced,
        is_win: exact as usize == secret.len(),
    }
}

/// Value counts over the residual (non-exact) positions.
#[derive(Debug)]
enum FrequencyTable {
    Dense(Vec<u32>),
    Sparse(HashMap<u32, u32>),
}

impl FrequencyTable {
    fn for_range(max_number: u32) -> Self {
        if max_number <= DENSE_TABLE_LIMIT {
            Self::Dense(vec![0; max_number as usize + 1])
        } else {
            Self::Sparse(HashMap::new())
        }
    }

    fn add(&mut self, value: u32) {
        match self {
            Self::Dense(counts) => {
                if let Some(slot) = counts.get_mut(value as usize) {
                    *slot += 1;
                }
            }
            Self::Sparse(counts) => *counts.entry(value).or_insert(0) += 1,
        }
    }

    fn count(&self, value: u32) -> u32 {
        match self {
            Self::Dense(counts) => counts.get(value as usize).copied().unwrap_or(0),
            Self::Sparse(counts) => counts.get(&value).copied().unwrap_or(0),
        }
    }

    /// Sum over every value of `min(self[v], other[v])`.
    fn overlap(&self, other: &Self) -> u32 {
        match self {
            Self::Dense(counts) => counts
                .iter()
                .enumerate()
                .map(|(value, &n)| n.min(other.count(value as u32)))
                .sum(),
            Self::Sparse(counts) => counts
                .iter()
                .map(|(&value, &n)| n.min(other.count(value)))
                .sum(),
        }
    }
}
