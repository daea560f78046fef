//! Prometheus metrics registry for the restock watcher.
//!
//! [`AppMetrics`] owns all registered metrics and the [`Registry`] they
//! belong to. Construct it once at startup, wrap in `Arc`, and pass it
//! to the scheduler and the keep-alive server.
//!
//! Exposed at `GET /metrics` in Prometheus text exposition format
//! (`text/plain; version=0.0.4`).

use prometheus::{Counter, Gauge, Opts, Registry};

/// All application-level Prometheus metrics.
pub struct AppMetrics {
    /// Total inventory polling attempts (success + failure).
    pub polls_total: Counter,
    /// Polls whose outcome classified as `error` or `not_found`.
    pub poll_errors_total: Counter,
    /// Polls whose outcome classified as `available`.
    pub stock_hits_total: Counter,
    /// Outbound notifications handed to the notifier.
    pub notifications_sent_total: Counter,
    /// Number of SKUs being tracked.
    pub skus_tracked: Gauge,
    /// The registry that owns all of the above metrics.
    pub registry: Registry,
}

impl AppMetrics {
    /// Create and register all metrics. Returns an error if any metric
    /// name is invalid or duplicated (should not happen in practice).
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let polls_total = Counter::with_opts(Opts::new(
            "restock_watcher_polls_total",
            "Total inventory polling attempts",
        ))?;

        let poll_errors_total = Counter::with_opts(Opts::new(
            "restock_watcher_poll_errors_total",
            "Polls that classified as error or not_found",
        ))?;

        let stock_hits_total = Counter::with_opts(Opts::new(
            "restock_watcher_stock_hits_total",
            "Polls that classified as available",
        ))?;

        let notifications_sent_total = Counter::with_opts(Opts::new(
            "restock_watcher_notifications_sent_total",
            "Notifications handed to the notifier",
        ))?;

        let skus_tracked = Gauge::with_opts(Opts::new(
            "restock_watcher_skus_tracked",
            "Number of SKUs being tracked",
        ))?;

        registry.register(Box::new(polls_total.clone()))?;
        registry.register(Box::new(poll_errors_total.clone()))?;
        registry.register(Box::new(stock_hits_total.clone()))?;
        registry.register(Box::new(notifications_sent_total.clone()))?;
        registry.register(Box::new(skus_tracked.clone()))?;

        Ok(Self {
            polls_total,
            poll_errors_total,
            stock_hits_total,
            notifications_sent_total,
            skus_tracked,
            registry,
        })
    }

    /// Render all metrics as Prometheus text format (for `/metrics`).
    pub fn render(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buf = Vec::new();
        encoder.encode(&metric_families, &mut buf)?;
        Ok(String::from_utf8(buf).unwrap_or_default())
    }
}
