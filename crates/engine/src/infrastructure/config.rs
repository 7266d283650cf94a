//! Engine configuration loaded from the environment.
//!
//! Call `dotenvy` before [`EngineConfig::from_env`] so `.env` values are
//! visible. Unparseable values are logged and replaced by their default.

use eventia_domain::Money;

/// Default number of reload-and-retry rounds after a version conflict.
pub const DEFAULT_MAX_CONFLICT_RETRIES: u32 = 5;

/// Default currency for the demo binary.
pub const DEFAULT_CURRENCY: &str = "EUR";

/// Default number of simulated concurrent buyers.
pub const DEFAULT_DEMO_BUYERS: usize = 8;

pub const ENV_MAX_CONFLICT_RETRIES: &str = "EVENTIA_MAX_CONFLICT_RETRIES";
pub const ENV_DEFAULT_CURRENCY: &str = "EVENTIA_DEFAULT_CURRENCY";
pub const ENV_DEMO_BUYERS: &str = "EVENTIA_DEMO_BUYERS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Retries after the first attempt (0 = no retries, just the initial attempt)
    pub max_conflict_retries: u32,
    /// ISO 4217 code, upper-cased
    pub default_currency: String,
    pub demo_buyers: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_conflict_retries: DEFAULT_MAX_CONFLICT_RETRIES,
            default_currency: DEFAULT_CURRENCY.to_string(),
            demo_buyers: DEFAULT_DEMO_BUYERS,
        }
    }
}

impl EngineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let max_conflict_retries = parse_or(
            ENV_MAX_CONFLICT_RETRIES,
            lookup(ENV_MAX_CONFLICT_RETRIES),
            defaults.max_conflict_retries,
        );

        let default_currency = match lookup(ENV_DEFAULT_CURRENCY) {
            Some(raw) => match Money::zero(raw.trim()) {
                Ok(zero) => zero.currency().to_string(),
                Err(e) => {
                    tracing::warn!(
                        key = ENV_DEFAULT_CURRENCY,
                        value = %raw,
                        error = %e,
                        "Invalid currency, using default"
                    );
                    defaults.default_currency
                }
            },
            None => defaults.default_currency,
        };

        let demo_buyers = parse_or(
            ENV_DEMO_BUYERS,
            lookup(ENV_DEMO_BUYERS),
            defaults.demo_buyers,
        );
        let demo_buyers = match demo_buyers {
            0 => {
                tracing::warn!(
                    key = ENV_DEMO_BUYERS,
                    "Demo buyers must be positive, using default"
                );
                defaults.demo_buyers
            }
            n => n,
        };

        Self {
            max_conflict_retries,
            default_currency,
            demo_buyers,
        }
    }

    pub fn retry_policy(&self) -> ConflictRetry {
        ConflictRetry::new(self.max_conflict_retries)
    }
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(key, value = %raw, "Invalid value, using default");
            default
        }
    }
}

/// How many times an optimistic read-modify-write is re-run after losing a
/// compare-and-swap race.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConflictRetry {
    pub max_retries: u32,
}

impl ConflictRetry {
    pub fn new(max_retries: u32) -> Self {
        Self { max_retries }
    }

    /// Total attempts including the first one.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

impl Default for ConflictRetry {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONFLICT_RETRIES)
    }
}
