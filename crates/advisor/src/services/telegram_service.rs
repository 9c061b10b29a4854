use std::env;
use teloxide::prelude::*;
use tracing::{info, warn};

pub struct TelegramService {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramService {
    /// `None` unless both `TELEGRAM_BOT_TOKEN` and a numeric
    /// `TELEGRAM_CHAT_ID` are set.
    pub fn from_env() -> Option<Self> {
        let token = env::var("TELEGRAM_BOT_TOKEN").ok()?;
        let chat_id_str = env::var("TELEGRAM_CHAT_ID").ok()?;
        let chat_id = match chat_id_str.trim().parse::<i64>() {
            Ok(id) => id,
            Err(_) => {
                warn!("TELEGRAM_CHAT_ID must be a number, got {:?}", chat_id_str);
                return None;
            }
        };

        Some(Self {
            bot: Bot::new(token),
            chat_id: ChatId(chat_id),
        })
    }

    pub async fn send(&self, text: String) -> anyhow::Result<()> {
        self.bot.send_message(self.chat_id, text).await?;
        info!("Notification delivered to chat {}", self.chat_id.0);
        Ok(())
    }
}
