//! pricewatch - Telegram price lookup and alert bot.
//!
//! Reads its configuration from the environment, wires the quote provider
//! and the alert core together, spawns the recurring evaluator and serves
//! Telegram commands until shutdown.

mod commands;
mod config;
mod format;

use commands::{AlertContext, PriceWatchBot};
use config::BotConfig;
use pricewatch_alerts::{AlertStore, Evaluator, Registrar, TelegramNotifier};
use pricewatch_quotes::{FearGreedClient, LiveCoinWatchClient};
use std::sync::Arc;
use teloxide::Bot;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_logging();

    let config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "startup configuration invalid");
            std::process::exit(1);
        }
    };

    let bot = Bot::new(&config.bot_token);
    let quotes = Arc::new(LiveCoinWatchClient::new(config.api_key.clone()));
    let sentiment = FearGreedClient::new();

    // Alerting is a capability: no DATABASE_URL simply disables the alert
    // commands. A configured store that cannot be opened is fatal.
    let alerting = match &config.database_url {
        Some(url) => {
            let store = match AlertStore::connect(url).await {
                Ok(store) => store,
                Err(err) => {
                    error!(error = %err, "failed to open alert store");
                    std::process::exit(1);
                }
            };

            let notifier = Arc::new(TelegramNotifier::new(bot.clone()));
            let evaluator = Evaluator::new(
                store.clone(),
                quotes.clone(),
                notifier,
                config.evaluator.clone(),
            );
            tokio::spawn(evaluator.run());

            Some(AlertContext {
                store: store.clone(),
                registrar: Registrar::new(store, quotes.clone()),
                list_limit: config.list_limit,
            })
        }
        None => {
            info!("DATABASE_URL not set, alert commands disabled");
            None
        }
    };

    info!(
        alerts_enabled = alerting.is_some(),
        "pricewatch bot running"
    );

    let handler = Arc::new(PriceWatchBot::new(bot, quotes, sentiment, alerting));
    handler.run().await;
}
