use anyhow::{bail, Context, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub port: u16,
    pub skip_migrations: bool,
    pub search_cache_ttl: Duration,
    pub cache_sweep_interval: Duration,
    pub request_timeout: Duration,
    pub allowed_origins: Vec<String>,
    pub gql_introspection: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let config = Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            database_max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 30),
            port: parse_or("PORT", 8080),
            skip_migrations: env::var("SKIP_MIGRATIONS")
                .map(|v| v.to_lowercase() == "true")
                .unwrap_or(false),
            search_cache_ttl: Duration::from_secs(parse_or("SEARCH_CACHE_TTL_SECONDS", 300)),
            cache_sweep_interval: Duration::from_secs(parse_or("CACHE_SWEEP_INTERVAL_SECONDS", 60)),
            request_timeout: Duration::from_secs(parse_or("REQUEST_TIMEOUT_SECONDS", 30)),
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000,http://localhost:3001".to_string())
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect(),
            gql_introspection: env::var("GQL_INTROSPECTION")
                .map(|v| v == "true")
                .unwrap_or(false),
        };
        config.validate()?;
        Ok(config)
    }

    /// Every duration must be at least one second; `tokio::time::interval`
    /// panics on a zero period.
    pub fn validate(&self) -> Result<()> {
        if self.search_cache_ttl.is_zero() {
            bail!("SEARCH_CACHE_TTL_SECONDS must be at least 1");
        }
        if self.cache_sweep_interval.is_zero() {
            bail!("CACHE_SWEEP_INTERVAL_SECONDS must be at least 1");
        }
        if self.request_timeout.is_zero() {
            bail!("REQUEST_TIMEOUT_SECONDS must be at least 1");
        }
        Ok(())
    }

    /// Defaults for everything except the database URL; used by tests.
    pub fn with_database_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            database_max_connections: 5,
            port: 8080,
            skip_migrations: false,
            search_cache_ttl: Duration::from_secs(300),
            cache_sweep_interval: Duration::from_secs(60),
            request_timeout: Duration::from_secs(30),
            allowed_origins: Vec::new(),
            gql_introspection: false,
        }
    }
}

// Unset or malformed values fall back to the default.
fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}
