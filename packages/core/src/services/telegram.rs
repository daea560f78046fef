//! Telegram Bot API client — long polling + message sending.
//!
//! Thin typed wrapper over the HTTP Bot API; command handling lives in
//! `bot.rs` and notification templates in `alerts/`.

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::error::AppError;

/// Markup mode for outgoing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    Plain,
    /// Requires every reserved character to be escaped, see
    /// [`escape_markdown_v2`].
    MarkdownV2,
}

pub struct TelegramClient {
    token: String,
    base_url: String,
    http: Client,
    last_update_id: i64,
}

impl TelegramClient {
    pub fn new(token: String) -> Self {
        Self::with_base_url("https://api.telegram.org".to_string(), token)
    }

    pub fn with_base_url(base_url: String, token: String) -> Self {
        Self {
            token,
            base_url,
            http: Client::new(),
            last_update_id: 0,
        }
    }

    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    /// Fetch new updates via long polling, advancing the offset so each
    /// update is delivered once.
    pub async fn get_updates(&mut self) -> Result<Vec<TgUpdate>, AppError> {
        let response = self
            .http
            .get(self.api_url("getUpdates"))
            .query(&[
                ("offset", (self.last_update_id + 1).to_string()),
                ("timeout", "30".to_string()),
                ("allowed_updates", "[\"message\"]".to_string()),
            ])
            .send()
            .await
            .map_err(|err| AppError::Channel(format!("getUpdates failed: {}", err)))?;

        let body: TgApiResponse<Vec<TgUpdate>> = response
            .json()
            .await
            .map_err(|err| AppError::Parse(format!("invalid getUpdates response: {}", err)))?;

        if !body.ok {
            return Err(AppError::Channel(format!(
                "Telegram API error: {}",
                body.description.unwrap_or_default()
            )));
        }

        let updates = body.result.unwrap_or_default();
        if let Some(last) = updates.last() {
            self.last_update_id = last.update_id;
        }
        Ok(updates)
    }

    pub async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        mode: ParseMode,
    ) -> Result<(), AppError> {
        let mut body = json!({
            "chat_id": chat_id,
            "text": text,
        });
        if mode == ParseMode::MarkdownV2 {
            body["parse_mode"] = json!("MarkdownV2");
        }

        let response = self
            .http
            .post(self.api_url("sendMessage"))
            .json(&body)
            .send()
            .await
            .map_err(|err| AppError::Channel(format!("sendMessage failed: {}", err)))?;

        let result: TgApiResponse<serde_json::Value> = response
            .json()
            .await
            .map_err(|err| AppError::Parse(format!("invalid sendMessage response: {}", err)))?;

        if !result.ok {
            return Err(AppError::Channel(format!(
                "sendMessage rejected: {}",
                result.description.unwrap_or_default()
            )));
        }
        Ok(())
    }

    /// Identify the bot. Used once at startup as a credentials check.
    pub async fn get_me(&self) -> Result<TgUser, AppError> {
        let response = self
            .http
            .get(self.api_url("getMe"))
            .send()
            .await
            .map_err(|err| AppError::Channel(format!("getMe failed: {}", err)))?;

        let body: TgApiResponse<TgUser> = response
            .json()
            .await
            .map_err(|err| AppError::Parse(format!("invalid getMe response: {}", err)))?;

        if !body.ok {
            return Err(AppError::Channel(format!(
                "getMe rejected: {}",
                body.description.unwrap_or_default()
            )));
        }

        body.result
            .ok_or_else(|| AppError::Channel("getMe returned no bot info".to_string()))
    }
}

/// Escape all characters MarkdownV2 treats as structural. Telegram
/// rejects the whole message when any of them appears unescaped.
pub fn escape_markdown_v2(text: &str) -> String {
    const RESERVED: &[char] = &[
        '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
    ];
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if RESERVED.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

// --- Bot API wire types ---

#[derive(Debug, Deserialize)]
pub struct TgApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TgUpdate {
    pub update_id: i64,
    pub message: Option<TgMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TgMessage {
    pub message_id: i64,
    pub from: Option<TgUser>,
    pub chat: TgChat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TgUser {
    pub id: i64,
    pub is_bot: bool,
    pub first_name: String,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TgChat {
    pub id: i64,
}
