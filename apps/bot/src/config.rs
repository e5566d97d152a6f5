//! Environment-driven bot configuration.

use pricewatch_alerts::EvaluatorConfig;
use std::env;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Telegram bot token.
    pub bot_token: String,
    /// LiveCoinWatch API key.
    pub api_key: String,
    /// Alert database URL. Absent means alert commands are disabled,
    /// not that startup failed.
    pub database_url: Option<String>,
    /// Evaluator scheduling.
    pub evaluator: EvaluatorConfig,
    /// Maximum alerts returned by a single listing.
    pub list_limit: i64,
}

impl BotConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bot_token = env::var("BOT_TOKEN").map_err(|_| ConfigError::Missing("BOT_TOKEN"))?;

        // Both names are supported; deployments set whichever they have.
        let api_key = env::var("LIVECOINWATCH_API_KEY")
            .or_else(|_| env::var("API_KEY"))
            .map_err(|_| ConfigError::Missing("LIVECOINWATCH_API_KEY"))?;

        let database_url = env::var("DATABASE_URL").ok();

        let evaluator = EvaluatorConfig {
            interval: Duration::from_secs(parse_var("ALERT_INTERVAL_SECS", 120)?),
            initial_delay: Duration::from_secs(parse_var("ALERT_INITIAL_DELAY_SECS", 15)?),
        };

        Ok(Self {
            bot_token,
            api_key,
            database_url,
            evaluator,
            list_limit: parse_var("ALERT_LIST_LIMIT", 50)?,
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ConfigError::Invalid(name, raw)),
        Err(_) => Ok(default),
    }
}
