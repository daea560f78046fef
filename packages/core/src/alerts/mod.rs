//! Outbound notification delivery.
//!
//! The scheduler talks to a [`Notifier`] and never to the transport
//! directly. Delivery failures are the notifier's problem: they are
//! logged and swallowed so a rejected message can never stall the poll
//! loop or un-record an outcome that is already in the ledger.

pub mod telegram;

use async_trait::async_trait;

use crate::classifier::Outcome;

pub use telegram::TelegramNotifier;

/// Fire-and-forget notification sink.
#[async_trait]
pub trait Notifier {
    /// A tracked SKU just classified as available.
    async fn stock_available(&self, sku: &str, price: Option<&str>);

    /// A tracked SKU produced a `NotFound` or `Error` outcome.
    async fn sku_problem(&self, sku: &str, outcome: &Outcome);
}

/// Marketplace link included in stock notifications.
pub fn buy_link(sku: &str, locale: &str) -> String {
    format!(
        "https://www.mi.com/{}/buy/detail?product_id={}",
        locale, sku
    )
}

/// Stock-available message body.
pub fn render_stock_available(sku: &str, locale: &str, price: Option<&str>) -> String {
    format!(
        "🟢 SKU {} is in stock ({})! Price: {}\n{}",
        sku,
        locale,
        price.unwrap_or("unknown"),
        buy_link(sku, locale)
    )
}

/// SKU-problem message body. Distinguishes a stale identifier from a
/// malformed or failed check.
pub fn render_sku_problem(sku: &str, locale: &str, outcome: &Outcome) -> String {
    match outcome {
        Outcome::NotFound => format!(
            "⚠️ SKU {} is no longer valid ({}) — the store returned no listing for it.",
            sku, locale
        ),
        Outcome::Error { detail } => {
            format!("⚠️ SKU {} check failed ({}): {}", sku, locale, detail)
        }
        // The scheduler never routes these here; render something
        // honest anyway rather than panicking.
        other => format!("⚠️ SKU {} reported unexpected state: {:?}", sku, other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_message_contains_sku_locale_price_and_link() {
        let msg = render_stock_available("16207", "en-us", Some("1999"));
        assert!(msg.contains("16207"));
        assert!(msg.contains("en-us"));
        assert!(msg.contains("1999"));
        assert!(msg.contains("https://www.mi.com/en-us/buy/detail?product_id=16207"));
    }

    #[test]
    fn stock_message_without_price_says_unknown() {
        let msg = render_stock_available("16207", "en-us", None);
        assert!(msg.contains("unknown"));
    }

    #[test]
    fn not_found_problem_mentions_invalid_sku() {
        let msg = render_sku_problem("16207", "en-us", &Outcome::NotFound);
        assert!(msg.contains("no longer valid"));
        assert!(msg.contains("16207"));
        assert!(msg.contains("en-us"));
    }

    #[test]
    fn error_problem_includes_the_detail() {
        let outcome = Outcome::Error {
            detail: "listMap is empty or not an array".to_string(),
        };
        let msg = render_sku_problem("16207", "en-us", &outcome);
        assert!(msg.contains("listMap is empty or not an array"));
        assert!(!msg.contains("no longer valid"));
    }
}
