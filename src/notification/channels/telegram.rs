//! Telegram 渠道（Bot API sendMessage）

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::TELEGRAM_API_URL;
use crate::error::{BotError, Result};
use crate::notification::channel::NotificationChannel;

/// Telegram 渠道配置
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Bot API 基础地址
    pub api_url: String,
    /// Bot token
    pub bot_token: String,
    /// Chat ID
    pub chat_id: String,
}

impl TelegramConfig {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            api_url: TELEGRAM_API_URL.to_string(),
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
        }
    }
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Telegram 渠道
pub struct TelegramChannel {
    client: reqwest::blocking::Client,
    config: TelegramConfig,
}

impl TelegramChannel {
    /// 创建 Telegram 渠道（发送不设超时）
    pub fn new(config: TelegramConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(None::<Duration>)
            .build()
            .map_err(|e| BotError::Unclassified(format!("Cannot create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.config.api_url.trim_end_matches('/'),
            self.config.bot_token
        )
    }
}

impl NotificationChannel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    fn send(&self, text: &str) -> Result<()> {
        let request = SendMessageRequest {
            chat_id: &self.config.chat_id,
            text,
        };

        // URL 中带有 bot token，错误信息里去掉
        let response = self
            .client
            .post(self.send_message_url())
            .json(&request)
            .send()
            .map_err(|e| BotError::NotificationDelivery(e.without_url().to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| BotError::NotificationDelivery(e.without_url().to_string()))?;

        let parsed = serde_json::from_str::<TelegramResponse>(&body).ok();
        match parsed {
            Some(resp) if status.is_success() && resp.ok => {
                debug!(chat_id = %self.config.chat_id, "Telegram message sent");
                Ok(())
            }
            Some(resp) => Err(BotError::NotificationDelivery(format!(
                "Telegram API error ({}): {}",
                status,
                resp.description.unwrap_or_else(|| "unknown error".to_string())
            ))),
            None => Err(BotError::NotificationDelivery(format!(
                "Telegram API error ({}): {}",
                status, body
            ))),
        }
    }
}
