//! Environment-driven configuration.

use std::time::Duration;

use anyhow::{Context, bail};

use microshop_infra::DEFAULT_NOTIFICATION_TOPIC;

/// Persistent orders need a durable event transport; the in-process bus
/// has no subscribers outside this process.
pub const PERSISTENT_NEEDS_REDIS: &str =
    "USE_PERSISTENT_STORES=true requires a build with the `redis` feature";

/// Runtime settings for the Order Placement Orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind_addr: String,
    /// Base URL of the Stock Query Service.
    pub inventory_url: String,
    /// Upper bound on one stock lookup (connect + response).
    pub inventory_timeout: Duration,
    /// Topic receiving `OrderPlacedEvent` envelopes.
    pub topic: String,
    /// Postgres connection string; `None` selects the in-memory order store.
    pub database_url: Option<String>,
    /// Only used by builds with the `redis` feature, in persistent mode.
    pub redis_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8081".to_string(),
            inventory_url: "http://localhost:8082".to_string(),
            inventory_timeout: Duration::from_millis(5000),
            topic: DEFAULT_NOTIFICATION_TOPIC.to_string(),
            database_url: None,
            redis_url: "redis://localhost:6379".to_string(),
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

        let inventory_timeout = match get("INVENTORY_TIMEOUT_MS") {
            Some(raw) => {
                let ms: u64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("INVENTORY_TIMEOUT_MS is not a number: {raw}"))?;
                if ms == 0 {
                    bail!("INVENTORY_TIMEOUT_MS must be greater than zero");
                }
                Duration::from_millis(ms)
            }
            None => defaults.inventory_timeout,
        };

        let persistent = get("USE_PERSISTENT_STORES").is_some_and(|v| v.eq_ignore_ascii_case("true"));
        let database_url = if persistent {
            if cfg!(not(feature = "redis")) {
                bail!(PERSISTENT_NEEDS_REDIS);
            }
            match get("DATABASE_URL") {
                Some(url) => Some(url),
                None => bail!("DATABASE_URL must be set when USE_PERSISTENT_STORES=true"),
            }
        } else {
            None
        };

        Ok(Self {
            bind_addr: get("BIND_ADDR").unwrap_or(defaults.bind_addr),
            inventory_url: get("INVENTORY_SERVICE_URL").unwrap_or_else(|| {
                tracing::warn!(
                    "INVENTORY_SERVICE_URL not set; defaulting to {}",
                    defaults.inventory_url
                );
                defaults.inventory_url
            }),
            inventory_timeout,
            topic: get("NOTIFICATION_TOPIC")
                .filter(|t| !t.trim().is_empty())
                .unwrap_or(defaults.topic),
            database_url,
            redis_url: get("REDIS_URL").unwrap_or(defaults.redis_url),
        })
    }
}
