//! Telegram command surface.
//!
//! Thin layer over the core: parses command arguments, calls into the
//! quotes/alerts crates and renders replies. Core errors map to the
//! user-facing texts here; nothing in this module retries.

use crate::format;
use pricewatch_alerts::{format_price, AlertStore, RegisterError, Registrar};
use pricewatch_core::normalize_symbol;
use pricewatch_quotes::{FearGreedClient, LiveCoinWatchClient, QuoteError, QuoteProvider};
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use teloxide::utils::command::BotCommands;
use tracing::warn;

const DEFAULT_TOP_COUNT: usize = 5;
const MAX_TOP_COUNT: usize = 10;

/// Bot commands.
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Start the bot")]
    Start,
    #[command(description = "Show help")]
    Help,
    #[command(description = "Look up a price. Usage: /price BTC")]
    Price(String),
    #[command(description = "Top movers by 24h change. Usage: /top [count]")]
    Top(String),
    #[command(description = "Crypto Fear & Greed index")]
    Sentiment,
    #[command(description = "Create a price alert. Usage: /alert BTC 50000")]
    Alert(String),
    #[command(description = "List your alerts")]
    Alerts,
    #[command(description = "Delete an alert by id. Usage: /delalert 3")]
    Delalert(String),
}

/// Alert capability, present only when a database is configured.
pub struct AlertContext {
    pub store: AlertStore,
    pub registrar: Registrar<LiveCoinWatchClient>,
    pub list_limit: i64,
}

/// Telegram bot front-end.
pub struct PriceWatchBot {
    bot: Bot,
    quotes: Arc<LiveCoinWatchClient>,
    sentiment: FearGreedClient,
    alerting: Option<AlertContext>,
}

impl PriceWatchBot {
    pub fn new(
        bot: Bot,
        quotes: Arc<LiveCoinWatchClient>,
        sentiment: FearGreedClient,
        alerting: Option<AlertContext>,
    ) -> Self {
        Self {
            bot,
            quotes,
            sentiment,
            alerting,
        }
    }

    /// Run the command dispatcher until shutdown.
    pub async fn run(self: Arc<Self>) {
        let bot = self.bot.clone();
        let handler = Update::filter_message().filter_command::<Command>().endpoint(
            move |bot: Bot, msg: Message, cmd: Command| {
                let this = Arc::clone(&self);
                async move { this.handle_command(bot, msg, cmd).await }
            },
        );

        Dispatcher::builder(bot, handler)
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    }

    async fn handle_command(
        &self,
        bot: Bot,
        msg: Message,
        cmd: Command,
    ) -> Result<(), teloxide::RequestError> {
        let chat_id = msg.chat.id;
        // The alert owner is the sending user; in channels without one,
        // fall back to the chat itself.
        let owner_id = msg
            .from
            .as_ref()
            .map(|user| user.id.to_string())
            .unwrap_or_else(|| chat_id.to_string());

        match cmd {
            Command::Start => {
                let alerts_line = if self.alerting.is_some() {
                    "Set a price alert with /alert BTC 50000."
                } else {
                    "Price alerts are not enabled on this deployment."
                };
                let text = format!(
                    "👋 Welcome to pricewatch!\n\n\
                     Look up a coin with /price BTC.\n\
                     {}\n\n\
                     Use /help to see all commands.",
                    alerts_line
                );
                bot.send_message(chat_id, text).await?;
            }

            Command::Help => {
                bot.send_message(chat_id, Command::descriptions().to_string())
                    .await?;
            }

            Command::Price(args) => {
                let symbol = normalize_symbol(&args);
                if symbol.is_empty() {
                    bot.send_message(chat_id, "Usage: /price <symbol>\nExample: /price BTC")
                        .await?;
                    return Ok(());
                }

                match self.quotes.get_quote(&symbol).await {
                    Ok(quote) => {
                        bot.send_message(chat_id, format::price_message(&symbol, &quote))
                            .parse_mode(ParseMode::Html)
                            .await?;
                    }
                    Err(QuoteError::NotFound) => {
                        bot.send_message(
                            chat_id,
                            "❌ Coin not found. Try a common ticker like BTC / ETH / SOL.",
                        )
                        .await?;
                    }
                    Err(QuoteError::Timeout) => {
                        bot.send_message(chat_id, "⏳ API timed out. Please try again.")
                            .await?;
                    }
                    Err(err) => {
                        warn!(symbol = %symbol, error = %err, "price lookup failed");
                        bot.send_message(chat_id, "⚠️ API error. Try another symbol or later.")
                            .await?;
                    }
                }
            }

            Command::Top(args) => {
                let count = match args.trim() {
                    "" => DEFAULT_TOP_COUNT,
                    raw => match raw.parse::<usize>() {
                        Ok(n) if (1..=MAX_TOP_COUNT).contains(&n) => n,
                        _ => {
                            bot.send_message(
                                chat_id,
                                format!("Usage: /top [1-{MAX_TOP_COUNT}]\nExample: /top 5"),
                            )
                            .await?;
                            return Ok(());
                        }
                    },
                };

                match self.quotes.top_movers(count).await {
                    Ok(listings) if listings.is_empty() => {
                        bot.send_message(chat_id, "⚠️ No market data right now. Try again later.")
                            .await?;
                    }
                    Ok(listings) => {
                        bot.send_message(chat_id, format::top_message(&listings))
                            .parse_mode(ParseMode::Html)
                            .await?;
                    }
                    Err(err) => {
                        warn!(error = %err, "top movers lookup failed");
                        bot.send_message(
                            chat_id,
                            "⚠️ Could not fetch market data. Try again later.",
                        )
                        .await?;
                    }
                }
            }

            Command::Sentiment => match self.sentiment.fetch().await {
                Ok(sentiment) => {
                    bot.send_message(chat_id, format::sentiment_message(&sentiment))
                        .parse_mode(ParseMode::Html)
                        .await?;
                }
                Err(err) => {
                    warn!(error = %err, "sentiment lookup failed");
                    bot.send_message(chat_id, "⚠️ Sentiment index unavailable. Try again later.")
                        .await?;
                }
            },

            Command::Alert(args) => {
                let Some(alerting) = &self.alerting else {
                    self.reply_alerts_disabled(&bot, chat_id).await?;
                    return Ok(());
                };

                let parts: Vec<&str> = args.split_whitespace().collect();
                let [symbol, raw_target] = parts.as_slice() else {
                    bot.send_message(
                        chat_id,
                        "Usage: /alert <symbol> <target price>\nExample: /alert BTC 50000",
                    )
                    .await?;
                    return Ok(());
                };

                let Ok(target) = raw_target.parse::<f64>() else {
                    bot.send_message(
                        chat_id,
                        "❌ That doesn't look like a number. Example: /alert BTC 50000",
                    )
                    .await?;
                    return Ok(());
                };

                match alerting
                    .registrar
                    .register(&owner_id, &chat_id.to_string(), symbol, target)
                    .await
                {
                    Ok(alert) => {
                        let text = format!(
                            "✅ Alert #{} set: <b>{}</b> {} {}\n\
                             You'll be notified once, then the alert is removed.",
                            alert.id,
                            alert.symbol,
                            alert.direction,
                            format_price(alert.target),
                        );
                        bot.send_message(chat_id, text)
                            .parse_mode(ParseMode::Html)
                            .await?;
                    }
                    Err(RegisterError::InvalidTarget) => {
                        bot.send_message(
                            chat_id,
                            "❌ That doesn't look like a number. Example: /alert BTC 50000",
                        )
                        .await?;
                    }
                    Err(RegisterError::UnknownSymbol(symbol)) => {
                        bot.send_message(
                            chat_id,
                            format!("❌ Coin not found: {symbol}. Try a common ticker like BTC."),
                        )
                        .await?;
                    }
                    Err(RegisterError::QuoteUnavailable(err)) => {
                        warn!(error = %err, "registration quote failed");
                        bot.send_message(
                            chat_id,
                            "⚠️ Price source unavailable. Try again in a moment.",
                        )
                        .await?;
                    }
                    Err(RegisterError::Store(err)) => {
                        warn!(error = %err, "alert insert failed");
                        bot.send_message(chat_id, "⚠️ Could not save the alert. Try again later.")
                            .await?;
                    }
                }
            }

            Command::Alerts => {
                let Some(alerting) = &self.alerting else {
                    self.reply_alerts_disabled(&bot, chat_id).await?;
                    return Ok(());
                };

                match alerting
                    .store
                    .list_by_owner(&owner_id, alerting.list_limit)
                    .await
                {
                    Ok(alerts) if alerts.is_empty() => {
                        bot.send_message(
                            chat_id,
                            "No alerts yet. Create one with /alert BTC 50000.",
                        )
                        .await?;
                    }
                    Ok(alerts) => {
                        let mut text = String::from("🔔 <b>Your alerts</b>");
                        for alert in &alerts {
                            text.push_str(&format!(
                                "\n#{} {} {} {}",
                                alert.id,
                                alert.symbol,
                                alert.direction,
                                format_price(alert.target),
                            ));
                        }
                        bot.send_message(chat_id, text)
                            .parse_mode(ParseMode::Html)
                            .await?;
                    }
                    Err(err) => {
                        warn!(error = %err, "alert listing failed");
                        bot.send_message(chat_id, "⚠️ Could not load your alerts. Try again later.")
                            .await?;
                    }
                }
            }

            Command::Delalert(args) => {
                let Some(alerting) = &self.alerting else {
                    self.reply_alerts_disabled(&bot, chat_id).await?;
                    return Ok(());
                };

                let Ok(id) = args.trim().parse::<i64>() else {
                    bot.send_message(chat_id, "Usage: /delalert <id>\nSee /alerts for ids.")
                        .await?;
                    return Ok(());
                };

                match alerting.store.delete_by_owner(id, &owner_id).await {
                    Ok(true) => {
                        bot.send_message(chat_id, format!("🗑 Alert #{id} deleted."))
                            .await?;
                    }
                    Ok(false) => {
                        bot.send_message(chat_id, format!("No alert #{id} found."))
                            .await?;
                    }
                    Err(err) => {
                        warn!(error = %err, "alert deletion failed");
                        bot.send_message(chat_id, "⚠️ Could not delete the alert. Try again later.")
                            .await?;
                    }
                }
            }
        }

        Ok(())
    }

    async fn reply_alerts_disabled(
        &self,
        bot: &Bot,
        chat_id: ChatId,
    ) -> Result<(), teloxide::RequestError> {
        bot.send_message(chat_id, "Price alerts are not enabled on this deployment.")
            .await?;
        Ok(())
    }
}
