//! In-memory status ledger.
//!
//! `StatusLedger` maps each configured SKU to its most recent
//! [`CheckRecord`]. It is latest-only: a new check always replaces the
//! prior record wholesale, and a SKU with no record simply has never
//! been checked. The configured SKU list doubles as the ordering
//! authority for round-robin polling and status reports.
//!
//! The ledger itself is not `Sync` — callers wrap it in
//! `Arc<RwLock<StatusLedger>>` so it can be shared between the polling
//! task (sole writer) and the bot / HTTP readers.

use std::collections::HashMap;

use crate::classifier::CheckRecord;

/// Latest-outcome-per-SKU store.
#[derive(Debug)]
pub struct StatusLedger {
    skus: Vec<String>,
    records: HashMap<String, CheckRecord>,
}

impl StatusLedger {
    /// Create a ledger for the given SKU list. Order is preserved and
    /// defines both polling and reporting order.
    pub fn new(skus: Vec<String>) -> Self {
        Self {
            records: HashMap::with_capacity(skus.len()),
            skus,
        }
    }

    /// The configured SKU list, in original order.
    pub fn skus(&self) -> &[String] {
        &self.skus
    }

    /// Unconditionally overwrite the record for `sku`. Callers only
    /// pass SKUs from the configured set; the ledger does not police
    /// membership.
    pub fn record(&mut self, sku: &str, record: CheckRecord) {
        self.records.insert(sku.to_string(), record);
    }

    /// Latest record for `sku`, or `None` when it has never been checked.
    pub fn get(&self, sku: &str) -> Option<&CheckRecord> {
        self.records.get(sku)
    }

    /// One `(sku, record)` pair per configured SKU, in configured order.
    pub fn snapshot(&self) -> Vec<(String, Option<CheckRecord>)> {
        self.skus
            .iter()
            .map(|sku| (sku.clone(), self.records.get(sku).cloned()))
            .collect()
    }

    /// `true` until the first check lands.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
