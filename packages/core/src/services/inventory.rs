//! Inventory API client.
//!
//! One GET per check against the store's delivery endpoint,
//! parameterized by SKU and locale. The header set mimics a desktop
//! Chrome request because the endpoint serves an empty payload to
//! obvious non-browser clients. Requests are bounded by a fixed
//! 30-second timeout; exceeding it surfaces as a network error, which
//! the classifier records as an `error` outcome — never a crash.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Errors from the inventory data provider seam.
#[derive(Error, Debug, Clone)]
pub enum ProviderError {
    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Data format error: {message}")]
    Format { message: String },
}

/// Top-level inventory response.
///
/// `listMap` is kept loose (`Value`) on purpose: the upstream sends
/// `null` for retired SKUs, `[]` on hiccups, and objects with mixed
/// string/number fields otherwise. Classification of those shapes
/// lives in `classifier.rs`, not here.
#[derive(Debug, Clone, Deserialize)]
pub struct InventoryPayload {
    pub success: bool,
    #[serde(rename = "listMap", default)]
    pub list_map: Value,
}

/// Seam between the scheduler and the concrete inventory source, so
/// tests can poll a scripted provider instead of the live endpoint.
#[async_trait]
pub trait StockProvider {
    async fn fetch_stock(&self, sku: &str) -> Result<InventoryPayload, ProviderError>;

    /// Provider name for logging.
    fn provider_name(&self) -> &str;
}

#[derive(Clone)]
pub struct InventoryClient {
    base_url: String,
    locale: String,
    http: Client,
}

impl InventoryClient {
    /// Production endpoint.
    pub const DEFAULT_BASE_URL: &'static str = "https://api2.order.mi.com/product/delivery";

    pub fn new(locale: String) -> Self {
        Self::with_base_url(Self::DEFAULT_BASE_URL.to_string(), locale)
    }

    /// Point the client at a different endpoint (integration tests use
    /// this with a wiremock server).
    pub fn with_base_url(base_url: String, locale: String) -> Self {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            base_url,
            locale,
            http,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl StockProvider for InventoryClient {
    async fn fetch_stock(&self, sku: &str) -> Result<InventoryPayload, ProviderError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("product_id", sku), ("locale", self.locale.as_str())])
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/json, text/plain, */*")
            .header("Accept-Language", "en-US,en;q=0.9")
            .header("Referer", "https://www.mi.com/")
            .send()
            .await
            .map_err(|err| ProviderError::Network {
                message: err.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(ProviderError::Network {
                message: format!("inventory API returned HTTP {}", response.status()),
            });
        }

        response
            .json::<InventoryPayload>()
            .await
            .map_err(|err| ProviderError::Format {
                message: err.to_string(),
            })
    }

    fn provider_name(&self) -> &str {
        "inventory-api"
    }
}
