//! Mastermind core - pure game logic.
//!
//! A hidden sequence of digits is drawn, the player submits guesses, and
//! each guess is scored by exact matches (right value, right position) and
//! value matches (right value anywhere, counted without double-counting
//! repeated digits).
//!
//! # Architecture
//!
//! - **Validator**: raw text to a bounded digit sequence
//! - **Score**: the peg-scoring algorithm
//! - **State**: immutable [`GameState`] with a single `with_guess` transition
//! - **Engine**: secret acquisition with local fallback, turn processing
//!
//! # Example
//!
//! ```
//! use mastermind_core::{FixedSource, GameConfig, GameEngine};
//!
//! let engine = GameEngine::new(FixedSource::new("1 2 3 4"));
//! let state = engine.create_new_game(GameConfig::defaults());
//! let state = engine.process_guess(&state, "4 3 2 1").unwrap();
//! let last = state.last_result().unwrap();
//! assert_eq!(*last.exact_matches(), 0);
//! assert_eq!(*last.value_matches(), 4);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod engine;
mod random;
mod score;
mod state;
mod validator;

pub use config::{
    DEFAULT_CODE_LENGTH, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_NUMBER, GameConfig, GameConfigError,
};
pub use engine::{GameEngine, GuessError};
pub use random::{FixedSource, LocalRandom, RandomError, RandomSource};
pub use score::{DENSE_TABLE_LIMIT, GuessResult, score};
pub use state::{GameState, GameStatus, Secret, StateError};
pub use validator::{ValidationError, format_code, validate};
