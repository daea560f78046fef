//! Stock polling scheduler.
//!
//! Drives the main polling loop: each tick checks exactly one SKU
//! (fetch, classify, ledger update, gate decision, notifier dispatch),
//! then advances a round-robin cursor and suspends for the configured
//! interval. Sequential single-flight polling is deliberate: outbound
//! load stays at one request per interval no matter how many SKUs are
//! tracked, which is all the rate tolerance the upstream grants.

use std::sync::Arc;
use std::time::Duration;

use tokio::signal;
use tokio::sync::RwLock;
use tokio::time;

use crate::alerts::Notifier;
use crate::classifier::{classify, CheckRecord, Outcome};
use crate::gate::NotificationGate;
use crate::ledger::StatusLedger;
use crate::metrics::AppMetrics;
use crate::services::inventory::StockProvider;

/// Round-robin position over the configured SKU list.
///
/// Wraps to the start after the last SKU; a single-SKU list simply
/// re-checks the same item every tick.
#[derive(Debug)]
pub struct PollCursor {
    skus: Vec<String>,
    index: usize,
}

impl PollCursor {
    /// `skus` must be non-empty; config validation guarantees this
    /// before the scheduler ever starts.
    pub fn new(skus: Vec<String>) -> Self {
        debug_assert!(!skus.is_empty());
        Self { skus, index: 0 }
    }

    /// SKU due for the current tick.
    pub fn current(&self) -> &str {
        &self.skus[self.index]
    }

    /// Move to the next SKU, wrapping after the last one.
    pub fn advance(&mut self) {
        self.index = (self.index + 1) % self.skus.len();
    }

    pub fn position(&self) -> usize {
        self.index
    }
}

/// Run the polling loop until Ctrl+C (SIGINT) is received.
///
/// A failed check never stops the loop — it is already captured as an
/// `error` outcome in the ledger, and the next tick fires one interval
/// later regardless.
pub async fn run_stock_polling(
    provider: Arc<dyn StockProvider + Send + Sync>,
    ledger: Arc<RwLock<StatusLedger>>,
    gate: Arc<NotificationGate>,
    notifier: Arc<dyn Notifier + Send + Sync>,
    metrics: Arc<AppMetrics>,
    poll_interval_seconds: u64,
) {
    let skus = ledger.read().await.skus().to_vec();
    metrics.skus_tracked.set(skus.len() as f64);
    let mut cursor = PollCursor::new(skus);

    let mut interval = time::interval(Duration::from_secs(poll_interval_seconds));

    tracing::info!(
        "Stock polling started ({} SKUs, interval: {}s, provider: {})",
        cursor.skus.len(),
        poll_interval_seconds,
        provider.provider_name()
    );

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let sku = cursor.current().to_string();
                poll_once(&provider, &ledger, &gate, &notifier, &metrics, &sku).await;
                cursor.advance();
            }

            _ = signal::ctrl_c() => {
                tracing::info!("Shutdown signal received. Stopping polling.");
                break;
            }
        }
    }

    tracing::info!("Stock polling stopped cleanly");
}

/// Execute a single poll cycle for one SKU. Extracted for testability.
///
/// The ledger is always updated with the classified outcome; the gate
/// only decides whether the notifier is invoked afterwards.
pub async fn poll_once(
    provider: &Arc<dyn StockProvider + Send + Sync>,
    ledger: &Arc<RwLock<StatusLedger>>,
    gate: &Arc<NotificationGate>,
    notifier: &Arc<dyn Notifier + Send + Sync>,
    metrics: &Arc<AppMetrics>,
    sku: &str,
) {
    metrics.polls_total.inc();

    // 1. Fetch and classify. Transport failures become `error`
    //    outcomes here, not early returns.
    let outcome = classify(provider.fetch_stock(sku).await);
    tracing::debug!("SKU {} classified as {:?}", sku, outcome);

    // 2. Record in the ledger, replacing the whole prior record.
    {
        let mut ledger = ledger.write().await;
        ledger.record(sku, CheckRecord::new(outcome.clone()));
    }

    // 3. Gate decision and dispatch.
    match &outcome {
        Outcome::Available { price } => {
            metrics.stock_hits_total.inc();
            if gate.stock_enabled() {
                notifier.stock_available(sku, price.as_deref()).await;
                metrics.notifications_sent_total.inc();
            }
        }
        Outcome::NotFound | Outcome::Error { .. } => {
            metrics.poll_errors_total.inc();
            if gate.errors_enabled() {
                notifier.sku_problem(sku, &outcome).await;
                metrics.notifications_sent_total.inc();
            }
        }
        Outcome::Unavailable { .. } => {}
    }
}
