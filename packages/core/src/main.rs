use std::sync::Arc;

use chrono::Utc;
use clap::Parser;
use dotenvy::dotenv;
use tokio::sync::RwLock;

use restock_watcher::alerts::{Notifier, TelegramNotifier};
use restock_watcher::api::{self, ApiState};
use restock_watcher::bot;
use restock_watcher::cli::Cli;
use restock_watcher::config::Config;
use restock_watcher::error::AppError;
use restock_watcher::gate::NotificationGate;
use restock_watcher::ledger::StatusLedger;
use restock_watcher::logging::init_logging;
use restock_watcher::metrics::AppMetrics;
use restock_watcher::scheduler;
use restock_watcher::services::inventory::{InventoryClient, StockProvider};
use restock_watcher::services::telegram::TelegramClient;

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_logging();

    let cli = Cli::parse();
    let config = Config::from_env()
        .map_err(AppError::Config)
        .unwrap_or_else(|err| {
            tracing::error!("{}", err);
            std::process::exit(1);
        })
        .apply_cli(&cli);

    tracing::info!(
        "Watching {} SKUs ({}) every {}s",
        config.skus.len(),
        config.locale,
        config.poll_interval_seconds
    );

    let started_at = Utc::now();

    let metrics = Arc::new(AppMetrics::new().unwrap_or_else(|err| {
        tracing::error!("Failed to build metrics registry: {}", err);
        std::process::exit(1);
    }));

    let ledger = Arc::new(RwLock::new(StatusLedger::new(config.skus.clone())));
    let gate = Arc::new(NotificationGate::new());

    let provider: Arc<dyn StockProvider + Send + Sync> =
        Arc::new(InventoryClient::new(config.locale.clone()));

    let notifier: Arc<dyn Notifier + Send + Sync> = Arc::new(TelegramNotifier::new(
        TelegramClient::new(config.telegram_bot_token.clone()),
        config.telegram_chat_id.clone(),
        config.locale.clone(),
    ));
    if config.telegram_chat_id.is_none() {
        tracing::warn!("TELEGRAM_CHAT_ID not set — notifications will be logged, not sent");
    }

    // Inbound command loop gets its own client so its long-poll offset
    // never interferes with outbound sends.
    let command_client = TelegramClient::new(config.telegram_bot_token.clone());

    // Credentials check: a bad token is a config error, fatal like any
    // other, and better caught now than on the first notification.
    match command_client.get_me().await {
        Ok(me) => tracing::info!(
            "Telegram bot authenticated as @{}",
            me.username.as_deref().unwrap_or(&me.first_name)
        ),
        Err(err) => {
            tracing::error!("Telegram credentials check failed: {}", err);
            std::process::exit(1);
        }
    }

    let bot_task = tokio::spawn(bot::run_command_loop(
        command_client,
        ledger.clone(),
        gate.clone(),
        started_at,
    ));

    let app = api::router(ApiState {
        started_at,
        metrics: metrics.clone(),
    });
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|err| {
            tracing::error!("Failed to bind {}: {}", addr, err);
            std::process::exit(1);
        });
    tracing::info!("Keep-alive server listening on {}", addr);
    let server_task = tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, app).await {
            tracing::error!("Keep-alive server error: {}", err);
        }
    });

    // The poll loop runs on the main task and only returns on Ctrl+C.
    scheduler::run_stock_polling(
        provider,
        ledger,
        gate,
        notifier,
        metrics,
        config.poll_interval_seconds,
    )
    .await;

    bot_task.abort();
    server_task.abort();
}
