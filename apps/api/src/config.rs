use std::str::FromStr;
use std::time::Duration;

use anyhow::{ensure, Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Sentences per scored passage.
    pub window_size: usize,
    /// Passages returned when no fact rule answers.
    pub max_passages: usize,
    pub search_delay_ms: u64,
    /// Start in `ready` instead of waiting for POST /api/v1/qa/enable.
    pub auto_enable: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let config = Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            window_size: parse_env("QA_WINDOW_SIZE", 2)?,
            max_passages: parse_env("QA_MAX_PASSAGES", 3)?,
            search_delay_ms: parse_env("QA_SEARCH_DELAY_MS", 200)?,
            auto_enable: parse_env("QA_AUTO_ENABLE", false)?,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        ensure!(self.window_size >= 1, "QA_WINDOW_SIZE must be at least 1");
        ensure!(self.max_passages >= 1, "QA_MAX_PASSAGES must be at least 1");
        Ok(())
    }

    pub fn search_delay(&self) -> Duration {
        Duration::from_millis(self.search_delay_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            window_size: 2,
            max_passages: 3,
            search_delay_ms: 200,
            auto_enable: false,
        }
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: '{raw}'")),
        Err(_) => Ok(default),
    }
}
