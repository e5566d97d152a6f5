//! Telegram-backed notification delivery.

use crate::notifier::{Notifier, NotifyError};
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::ParseMode;

/// Notifier that delivers through a Telegram bot, in HTML parse mode.
#[derive(Clone)]
pub struct TelegramNotifier {
    bot: Bot,
}

impl TelegramNotifier {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, chat_id: &str, text: &str) -> Result<(), NotifyError> {
        let id: i64 = chat_id
            .parse()
            .map_err(|_| NotifyError::InvalidTarget(chat_id.to_string()))?;

        self.bot
            .send_message(ChatId(id), text)
            .parse_mode(ParseMode::Html)
            .await
            .map_err(|e| NotifyError::SendFailed(e.to_string()))?;

        Ok(())
    }
}
