use std::net::SocketAddr;

use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Prometheus exporter address; the endpoint is disabled when unset.
    pub metrics_addr: Option<SocketAddr>,
    pub min_event_name_length: usize,
    pub max_event_name_length: usize,
    pub min_round_name_length: usize,
    pub max_round_name_length: usize,
    pub max_number_of_rounds: usize,
    pub default_page_length: u32,
    pub max_page_length: u32,
    pub cache_ttl_secs: u64,
    pub cache_capacity: u64,
    pub command_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").context("Cannot load HOST env variable")?,
            port: std::env::var("PORT")
                .context("Cannot load PORT env variable")?
                .parse()
                .context("PORT must be a number")?,
            database_url: std::env::var("DATABASE_URL")
                .context("Cannot load DATABASE_URL env variable")?,
            metrics_addr: std::env::var("METRICS_ADDR")
                .ok()
                .map(|addr| addr.parse())
                .transpose()
                .context("METRICS_ADDR must be a socket address")?,
            min_event_name_length: env_or("MIN_EVENT_NAME_LENGTH", 3)?,
            max_event_name_length: env_or("MAX_EVENT_NAME_LENGTH", 20)?,
            min_round_name_length: env_or("MIN_ROUND_NAME_LENGTH", 3)?,
            max_round_name_length: env_or("MAX_ROUND_NAME_LENGTH", 20)?,
            max_number_of_rounds: env_or("MAX_NUMBER_OF_ROUNDS", 10)?,
            default_page_length: env_or("DEFAULT_PAGE_LENGTH", 10)?,
            max_page_length: env_or("MAX_PAGE_LENGTH", 100)?,
            cache_ttl_secs: env_or("CACHE_TTL_SECS", 60)?,
            cache_capacity: env_or("CACHE_CAPACITY", 10_000)?,
            command_timeout_secs: env_or("COMMAND_TIMEOUT_SECS", 5)?,
        })
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(value) => value
            .parse()
            .with_context(|| format!("{key} has an invalid value")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_or_falls_back_to_default() {
        let value: usize = env_or("SURELY_UNSET_TUNING_KNOB", 42).unwrap();
        assert_eq!(value, 42);
    }
}
