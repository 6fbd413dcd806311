//! Environment-driven configuration.

use std::time::Duration;

use anyhow::{Context, bail};

/// Runtime settings for the Stock Query Service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind_addr: String,
    /// `code=qty,code=qty` records loaded into the store at startup.
    pub seed: String,
    /// Artificial delay before every lookup.
    pub lookup_delay: Duration,
    /// Postgres connection string; `None` selects the in-memory store.
    pub database_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8082".to_string(),
            seed: String::new(),
            lookup_delay: Duration::ZERO,
            database_url: None,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (tests pass a map instead of the
    /// process environment).
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let lookup_delay = match get("INVENTORY_LOOKUP_DELAY_MS") {
            Some(raw) => Duration::from_millis(
                raw.trim()
                    .parse()
                    .with_context(|| format!("INVENTORY_LOOKUP_DELAY_MS is not a number: {raw}"))?,
            ),
            None => defaults.lookup_delay,
        };

        let persistent = get("USE_PERSISTENT_STORES").is_some_and(|v| v.eq_ignore_ascii_case("true"));
        let database_url = if persistent {
            match get("DATABASE_URL") {
                Some(url) => Some(url),
                None => bail!("DATABASE_URL must be set when USE_PERSISTENT_STORES=true"),
            }
        } else {
            None
        };

        Ok(Self {
            bind_addr: get("BIND_ADDR").unwrap_or(defaults.bind_addr),
            seed: get("INVENTORY_SEED").unwrap_or_else(|| {
                tracing::warn!("INVENTORY_SEED not set; starting with an empty stock table");
                String::new()
            }),
            lookup_delay,
            database_url,
        })
    }
}
