//! random.org HTTP client: true-random secrets and quota checks.

use std::time::Duration;

use mastermind_core::{GameEngine, LocalRandom, RandomError, RandomSource};
use reqwest::blocking::Client;
use tracing::{debug, info, instrument, warn};

use crate::settings::{RandomSettings, SourceKind};

/// Largest `num` random.org accepts per request.
pub const MAX_QUANTITY: u32 = 10_000;

/// Largest absolute `min`/`max` random.org accepts.
pub const MAX_MAGNITUDE: i64 = 1_000_000_000;

/// Builds a blocking client with the given timeout.
#[instrument]
fn build_client(timeout: Duration) -> Result<Client, RandomError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| RandomError::Unavailable(format!("failed to build HTTP client: {}", e)))
}

/// Issues a GET and returns the body of a 2xx response.
#[instrument(skip(client))]
fn fetch_text(client: &Client, url: &str) -> Result<String, RandomError> {
    let response = client
        .get(url)
        .send()
        .map_err(|e| RandomError::Unavailable(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(RandomError::Unavailable(format!(
            "HTTP {}: {}",
            status,
            body.trim()
        )));
    }

    response
        .text()
        .map_err(|e| RandomError::Unavailable(format!("failed to read response: {}", e)))
}

/// Rejects requests random.org would refuse.
fn check_request(quantity: u32, min: i64, max: i64) -> Result<(), RandomError> {
    if quantity == 0 || quantity > MAX_QUANTITY {
        return Err(RandomError::InvalidRequest(format!(
            "quantity must be between 1 and {}, got {}",
            MAX_QUANTITY, quantity
        )));
    }
    if min.abs() > MAX_MAGNITUDE || max.abs() > MAX_MAGNITUDE {
        return Err(RandomError::InvalidRequest(format!(
            "bounds must be within -{0} and {0}",
            MAX_MAGNITUDE
        )));
    }
    if min > max {
        return Err(RandomError::InvalidRequest(format!(
            "min ({}) cannot be greater than max ({})",
            min, max
        )));
    }
    Ok(())
}

/// Collapses a one-integer-per-line body into space-separated text.
fn parse_plain_response(body: &str) -> Result<String, RandomError> {
    let tokens: Vec<&str> = body.split_whitespace().collect();
    if tokens.is_empty() {
        return Err(RandomError::Malformed("empty response".to_string()));
    }
    if let Some(bad) = tokens.iter().find(|t| t.parse::<i64>().is_err()) {
        return Err(RandomError::Malformed(format!("unexpected token '{}'", bad)));
    }
    Ok(tokens.join(" "))
}

/// Secret source backed by the random.org integer generator.
#[derive(Debug, Clone)]
pub struct RandomOrgSource {
    client: Client,
    api_url: String,
}

impl RandomOrgSource {
    /// Creates a source for `api_url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`RandomError::Unavailable`] if the HTTP client cannot be built.
    #[instrument(skip(api_url), fields(api_url = %api_url.as_ref()))]
    pub fn new(api_url: impl AsRef<str>, timeout: Duration) -> Result<Self, RandomError> {
        Ok(Self {
            client: build_client(timeout)?,
            api_url: api_url.as_ref().to_string(),
        })
    }

    /// Creates a source from the `[random]` settings table.
    ///
    /// # Errors
    ///
    /// Returns [`RandomError::Unavailable`] if the HTTP client cannot be built.
    #[instrument(skip(settings))]
    pub fn from_settings(settings: &RandomSettings) -> Result<Self, RandomError> {
        Self::new(
            settings.api_url(),
            Duration::from_secs(*settings.timeout_secs()),
        )
    }

    fn request_url(&self, quantity: u32, min: i64, max: i64) -> String {
        format!(
            "{}?num={}&min={}&max={}&col=1&base=10&format=plain&rnd=new",
            self.api_url, quantity, min, max
        )
    }
}

impl RandomSource for RandomOrgSource {
    #[instrument(skip(self))]
    fn generate(&self, quantity: u32, min: i64, max: i64) -> Result<String, RandomError> {
        check_request(quantity, min, max)?;
        let url = self.request_url(quantity, min, max);
        debug!(url = %url, "Requesting integers from random.org");

        let body = fetch_text(&self.client, &url)?;
        let numbers = parse_plain_response(&body)?;
        info!(quantity, "Received integers from random.org");
        Ok(numbers)
    }

    fn name(&self) -> &'static str {
        "random.org"
    }
}

/// Queries how many random bits remain in today's random.org allowance.
#[derive(Debug, Clone)]
pub struct QuotaChecker {
    client: Client,
    quota_url: String,
}

impl QuotaChecker {
    /// Creates a checker for `quota_url`.
    ///
    /// # Errors
    ///
    /// Returns [`RandomError::Unavailable`] if the HTTP client cannot be built.
    #[instrument(skip(quota_url), fields(quota_url = %quota_url.as_ref()))]
    pub fn new(quota_url: impl AsRef<str>, timeout: Duration) -> Result<Self, RandomError> {
        Ok(Self {
            client: build_client(timeout)?,
            quota_url: quota_url.as_ref().to_string(),
        })
    }

    /// Creates a checker from the `[random]` settings table.
    ///
    /// # Errors
    ///
    /// Returns [`RandomError::Unavailable`] if the HTTP client cannot be built.
    #[instrument(skip(settings))]
    pub fn from_settings(settings: &RandomSettings) -> Result<Self, RandomError> {
        Self::new(
            settings.quota_url(),
            Duration::from_secs(*settings.timeout_secs()),
        )
    }

    /// Remaining bits for this client's address.
    ///
    /// # Errors
    ///
    /// Returns [`RandomError`] if the service is unreachable or the body is
    /// not an integer.
    #[instrument(skip(self))]
    pub fn remaining_bits(&self) -> Result<i64, RandomError> {
        let body = fetch_text(&self.client, &self.quota_url)?;
        let bits = body
            .trim()
            .parse::<i64>()
            .map_err(|_| RandomError::Malformed(format!("unexpected quota '{}'", body.trim())))?;
        info!(bits, "random.org quota checked");
        Ok(bits)
    }
}

/// Builds the engine described by the `[random]` settings table.
///
/// A random.org source that cannot be constructed degrades to the local
/// generator.
#[instrument(skip(settings), fields(source = %settings.source()))]
pub fn build_engine(settings: &RandomSettings) -> GameEngine {
    match settings.source() {
        SourceKind::Local => GameEngine::new(LocalRandom::new()),
        SourceKind::RandomOrg => match RandomOrgSource::from_settings(settings) {
            Ok(source) => GameEngine::new(source),
            Err(e) => {
                warn!(error = %e, "random.org client unavailable, using local generator");
                GameEngine::new(LocalRandom::new())
            }
        },
    }
}
