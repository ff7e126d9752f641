//! Random-number sources for secret codes.

use std::cell::RefCell;

use derive_more::Display;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, instrument};

use crate::config::GameConfig;
use crate::state::Secret;
use crate::validator::format_code;

/// Capability to produce `quantity` integers in `min..=max`.
///
/// Implementations return space-separated decimal text. Resource cleanup is
/// not part of this trait; sources holding connections release them on drop.
pub trait RandomSource: std::fmt::Debug {
    /// Generates `quantity` integers in `min..=max` as space-separated text.
    ///
    /// # Errors
    ///
    /// Returns [`RandomError`] if no usable sequence could be produced.
    fn generate(&self, quantity: u32, min: i64, max: i64) -> Result<String, RandomError>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

impl<T: RandomSource + ?Sized> RandomSource for Box<T> {
    fn generate(&self, quantity: u32, min: i64, max: i64) -> Result<String, RandomError> {
        (**self).generate(quantity, min, max)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Failure to obtain random numbers.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum RandomError {
    /// The request parameters are outside what the source accepts.
    #[display("invalid random request: {_0}")]
    InvalidRequest(String),

    /// The source could not be reached or refused the request.
    #[display("random source unavailable: {_0}")]
    Unavailable(String),

    /// The source answered with something other than integers.
    #[display("malformed random response: {_0}")]
    Malformed(String),
}

impl std::error::Error for RandomError {}

/// In-process pseudo-random generator.
///
/// Used directly when no remote source is configured and as the fallback
/// when the configured source fails.
#[derive(Debug)]
pub struct LocalRandom {
    rng: RefCell<StdRng>,
}

impl LocalRandom {
    /// Creates a generator seeded from OS entropy.
    #[instrument]
    pub fn new() -> Self {
        Self {
            rng: RefCell::new(StdRng::from_entropy()),
        }
    }

    /// Creates a reproducible generator.
    #[instrument]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Draws a secret that conforms to `config` by construction.
    #[instrument(skip(self))]
    pub fn secret_for(&self, config: &GameConfig) -> Secret {
        let mut rng = self.rng.borrow_mut();
        let digits = (0..config.code_length())
            .map(|_| rng.gen_range(0..=config.max_number()))
            .collect();
        Secret::from_trusted(digits)
    }
}

impl Default for LocalRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for LocalRandom {
    #[instrument(skip(self))]
    fn generate(&self, quantity: u32, min: i64, max: i64) -> Result<String, RandomError> {
        if min > max {
            return Err(RandomError::InvalidRequest(format!(
                "min ({min}) cannot be greater than max ({max})"
            )));
        }
        let mut rng = self.rng.borrow_mut();
        let values: Vec<i64> = (0..quantity).map(|_| rng.gen_range(min..=max)).collect();
        let text = values
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        debug!(quantity, "Generated pseudo-random numbers");
        Ok(text)
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

/// Source that replays fixed text or always fails.
///
/// Useful for deterministic rounds in tests and demos.
#[derive(Debug, Clone)]
pub struct FixedSource {
    code: Option<String>,
}

impl FixedSource {
    /// Always returns `code`.
    #[instrument(skip(code))]
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
        }
    }

    /// Always returns [`RandomError::Unavailable`].
    #[instrument]
    pub fn failing() -> Self {
        Self { code: None }
    }

    /// Always returns the canonical text of `digits`.
    #[instrument]
    pub fn from_digits(digits: &[u32]) -> Self {
        Self::new(format_code(digits))
    }
}

impl RandomSource for FixedSource {
    #[instrument(skip(self))]
    fn generate(&self, _quantity: u32, _min: i64, _max: i64) -> Result<String, RandomError> {
        self.code
            .clone()
            .ok_or_else(|| RandomError::Unavailable("fixed source configured to fail".to_string()))
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}
