//! Telegram notification delivery.
//!
//! When no destination chat is configured the rendered message is
//! logged locally instead, so the watcher can run without a subscriber.

use async_trait::async_trait;

use crate::classifier::Outcome;
use crate::services::telegram::{ParseMode, TelegramClient};

use super::{render_sku_problem, render_stock_available, Notifier};

pub struct TelegramNotifier {
    client: TelegramClient,
    chat_id: Option<String>,
    locale: String,
}

impl TelegramNotifier {
    pub fn new(client: TelegramClient, chat_id: Option<String>, locale: String) -> Self {
        Self {
            client,
            chat_id,
            locale,
        }
    }

    async fn deliver(&self, text: String) {
        match &self.chat_id {
            Some(chat_id) => {
                if let Err(err) = self
                    .client
                    .send_message(chat_id, &text, ParseMode::Plain)
                    .await
                {
                    // A rejected send never aborts or retries the tick;
                    // the outcome is already in the ledger.
                    tracing::error!("Notification delivery failed: {}", err);
                }
            }
            None => {
                tracing::info!("No TELEGRAM_CHAT_ID configured, notification: {}", text);
            }
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn stock_available(&self, sku: &str, price: Option<&str>) {
        self.deliver(render_stock_available(sku, &self.locale, price))
            .await;
    }

    async fn sku_problem(&self, sku: &str, outcome: &Outcome) {
        self.deliver(render_sku_problem(sku, &self.locale, outcome))
            .await;
    }
}
