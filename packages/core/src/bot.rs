//! Inbound Telegram command loop.
//!
//! Long-polls the Bot API and answers the four supported commands.
//! Gate toggles from here may interleave with scheduler reads at any
//! time; each toggle is a single atomic flip, so no further
//! coordination is needed. Everything else this module touches is
//! read-only.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tokio::time;

use crate::gate::NotificationGate;
use crate::ledger::StatusLedger;
use crate::report::render_status;
use crate::services::telegram::{escape_markdown_v2, ParseMode, TelegramClient, TgUpdate};

/// Static usage text for `/start` and `/help`.
pub const USAGE_TEXT: &str = "Restock watcher commands:\n\
    /help — this text\n\
    /status — latest check result per tracked SKU\n\
    /togglestock — enable/disable in-stock notifications\n\
    /toggleerrors — enable/disable error notifications";

/// Supported inbound commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    ToggleStock,
    ToggleErrors,
    Status,
}

impl Command {
    /// Parse a message text into a command. Only the first word counts,
    /// and a `@BotName` suffix (group-chat form) is stripped. Anything
    /// unrecognized is ignored, not answered.
    pub fn parse(text: &str) -> Option<Self> {
        let first = text.split_whitespace().next()?;
        let name = first.split('@').next()?;
        match name {
            "/start" | "/help" => Some(Command::Help),
            "/togglestock" => Some(Command::ToggleStock),
            "/toggleerrors" => Some(Command::ToggleErrors),
            "/status" => Some(Command::Status),
            _ => None,
        }
    }
}

/// Confirmation line for a gate toggle.
fn toggle_reply(what: &str, enabled: bool) -> String {
    format!(
        "{} notifications are now {}",
        what,
        if enabled { "ON" } else { "OFF" }
    )
}

/// Run the command loop forever. Poll errors are logged and retried
/// after a short pause; the loop never terminates on its own.
pub async fn run_command_loop(
    mut client: TelegramClient,
    ledger: Arc<RwLock<StatusLedger>>,
    gate: Arc<NotificationGate>,
    started_at: DateTime<Utc>,
) {
    tracing::info!("Telegram command loop started");

    loop {
        match client.get_updates().await {
            Ok(updates) => {
                for update in updates {
                    handle_update(&client, &ledger, &gate, started_at, update).await;
                }
            }
            Err(err) => {
                tracing::error!("Telegram polling error: {}", err);
                time::sleep(Duration::from_secs(5)).await;
            }
        }

        time::sleep(Duration::from_secs(1)).await;
    }
}

async fn handle_update(
    client: &TelegramClient,
    ledger: &Arc<RwLock<StatusLedger>>,
    gate: &Arc<NotificationGate>,
    started_at: DateTime<Utc>,
    update: TgUpdate,
) {
    let message = match update.message {
        Some(m) => m,
        None => return,
    };
    let text = match &message.text {
        Some(t) => t,
        None => return,
    };
    if message.from.as_ref().map(|u| u.is_bot).unwrap_or(false) {
        return;
    }

    let command = match Command::parse(text) {
        Some(c) => c,
        None => return,
    };
    let chat_id = message.chat.id.to_string();

    let (reply, mode) = match command {
        Command::Help => (USAGE_TEXT.to_string(), ParseMode::Plain),
        Command::ToggleStock => (toggle_reply("Stock", gate.toggle_stock()), ParseMode::Plain),
        Command::ToggleErrors => (
            toggle_reply("Error", gate.toggle_errors()),
            ParseMode::Plain,
        ),
        Command::Status => {
            let snapshot = ledger.read().await.snapshot();
            let report = render_status(&snapshot, started_at, Utc::now());
            // MarkdownV2 rejects unescaped structural characters, and
            // SKU details can contain any of them.
            (escape_markdown_v2(&report), ParseMode::MarkdownV2)
        }
    };

    if let Err(err) = client.send_message(&chat_id, &reply, mode).await {
        tracing::error!("Failed to answer {:?} in chat {}: {}", command, chat_id, err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_and_help_both_map_to_help() {
        assert_eq!(Command::parse("/start"), Some(Command::Help));
        assert_eq!(Command::parse("/help"), Some(Command::Help));
    }

    #[test]
    fn toggles_and_status_parse() {
        assert_eq!(Command::parse("/togglestock"), Some(Command::ToggleStock));
        assert_eq!(Command::parse("/toggleerrors"), Some(Command::ToggleErrors));
        assert_eq!(Command::parse("/status"), Some(Command::Status));
    }

    #[test]
    fn group_chat_bot_suffix_is_stripped() {
        assert_eq!(
            Command::parse("/status@RestockWatcherBot"),
            Some(Command::Status)
        );
    }

    #[test]
    fn trailing_arguments_are_ignored() {
        assert_eq!(Command::parse("/help me please"), Some(Command::Help));
    }

    #[test]
    fn unknown_commands_and_plain_text_are_ignored() {
        assert_eq!(Command::parse("/restart"), None);
        assert_eq!(Command::parse("hello there"), None);
        assert_eq!(Command::parse(""), None);
    }

    #[test]
    fn toggle_reply_states_the_new_state() {
        assert_eq!(toggle_reply("Stock", true), "Stock notifications are now ON");
        assert_eq!(
            toggle_reply("Error", false),
            "Error notifications are now OFF"
        );
    }

    #[test]
    fn usage_text_lists_every_command() {
        for cmd in ["/help", "/status", "/togglestock", "/toggleerrors"] {
            assert!(USAGE_TEXT.contains(cmd), "usage is missing {}", cmd);
        }
    }
}
