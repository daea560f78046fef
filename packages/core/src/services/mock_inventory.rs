//! Scripted inventory provider for tests.
//!
//! Queued responses are served in order; once the queue runs dry the
//! mock keeps repeating its default response so loops can tick past
//! the scripted portion. Every `fetch_stock` call is recorded so tests
//! can assert on polling order.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::inventory::{InventoryPayload, ProviderError, StockProvider};

pub struct MockInventoryClient {
    script: Mutex<VecDeque<Result<InventoryPayload, ProviderError>>>,
    default: Result<InventoryPayload, ProviderError>,
    calls: Mutex<Vec<String>>,
}

impl MockInventoryClient {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            default: Ok(InventoryPayload {
                success: true,
                list_map: Value::Null,
            }),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue one scripted response.
    pub fn then_payload(self, payload: InventoryPayload) -> Self {
        self.script
            .lock()
            .expect("mock script lock poisoned")
            .push_back(Ok(payload));
        self
    }

    /// Queue one scripted failure.
    pub fn then_error(self, error: ProviderError) -> Self {
        self.script
            .lock()
            .expect("mock script lock poisoned")
            .push_back(Err(error));
        self
    }

    /// Response repeated once the script is exhausted.
    pub fn with_default(mut self, response: Result<InventoryPayload, ProviderError>) -> Self {
        self.default = response;
        self
    }

    /// SKUs fetched so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("mock calls lock poisoned").clone()
    }
}

impl Default for MockInventoryClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StockProvider for MockInventoryClient {
    async fn fetch_stock(&self, sku: &str) -> Result<InventoryPayload, ProviderError> {
        self.calls
            .lock()
            .expect("mock calls lock poisoned")
            .push(sku.to_string());

        let scripted = self
            .script
            .lock()
            .expect("mock script lock poisoned")
            .pop_front();

        scripted.unwrap_or_else(|| self.default.clone())
    }

    fn provider_name(&self) -> &str {
        "mock-inventory"
    }
}
