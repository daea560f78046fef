//! Response classification.
//!
//! Turns the raw result of one inventory-API call, either a parsed
//! payload or a transport failure, into exactly one [`Outcome`]. Pure
//! function, no side effects; the scheduler owns what happens next
//! (ledger update, notification dispatch).

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::services::inventory::{InventoryPayload, ProviderError};

/// Classified result of one inventory check for one SKU.
///
/// Kind-specific payloads replace the upstream's loose optional fields:
/// `price` only exists where a price was actually observed, `detail`
/// only where something went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Item is purchasable right now.
    Available { price: Option<String> },
    /// Item is listed but sold out. The price is usually still known.
    Unavailable { price: Option<String> },
    /// The upstream returned a null item list: the SKU itself is stale
    /// or invalid, not a transient fault.
    NotFound,
    /// Transport failure, upstream rejection, or malformed payload.
    Error { detail: String },
}

/// Latest check result for a SKU, as stored in the ledger.
///
/// Records are replaced whole on every check, never field-mutated, so
/// concurrent readers cannot observe a half-updated record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRecord {
    pub observed_at: DateTime<Utc>,
    pub outcome: Outcome,
}

impl CheckRecord {
    pub fn new(outcome: Outcome) -> Self {
        Self {
            observed_at: Utc::now(),
            outcome,
        }
    }
}

/// Classify one fetch result. Rules are evaluated in order:
///
/// 1. Transport failure → `Error` with the failure message
/// 2. `success: false` in the payload → `Error` (fixed detail)
/// 3. `listMap` null or absent → `NotFound`
/// 4. `listMap` not a non-empty array → `Error` (fixed detail)
/// 5. First item's `is_active` string-equals `"true"` → `Available`,
///    anything else → `Unavailable`; price carried in both
pub fn classify(result: Result<InventoryPayload, ProviderError>) -> Outcome {
    let payload = match result {
        Ok(p) => p,
        Err(err) => {
            return Outcome::Error {
                detail: err.to_string(),
            }
        }
    };

    if !payload.success {
        return Outcome::Error {
            detail: "API returned success: false".to_string(),
        };
    }

    let items = match &payload.list_map {
        Value::Null => return Outcome::NotFound,
        Value::Array(items) if !items.is_empty() => items,
        _ => {
            return Outcome::Error {
                detail: "listMap is empty or not an array".to_string(),
            }
        }
    };

    let item = &items[0];
    let price = value_as_text(item.get("price"));

    // The activity flag is compared as the literal string "true"; any
    // other shape (absent, "false", boolean, numeric) means inactive.
    let active = item
        .get("is_active")
        .and_then(Value::as_str)
        .map(|flag| flag == "true")
        .unwrap_or(false);

    if active {
        Outcome::Available { price }
    } else {
        Outcome::Unavailable { price }
    }
}

/// Render a loosely-typed JSON field as opaque text. The upstream mixes
/// string and numeric prices; both come out as their literal text, and
/// anything else is treated as absent.
fn value_as_text(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(success: bool, list_map: Value) -> InventoryPayload {
        InventoryPayload { success, list_map }
    }

    // ---- rule 1: transport failures ----

    #[test]
    fn transport_failure_classifies_as_error_with_message() {
        let outcome = classify(Err(ProviderError::Network {
            message: "connection timed out".to_string(),
        }));

        match outcome {
            Outcome::Error { detail } => assert!(detail.contains("connection timed out")),
            other => panic!("expected Error, got {:?}", other),
        }
    }

    // ---- rule 2: upstream rejection ----

    #[test]
    fn success_false_yields_error_with_fixed_detail() {
        let outcome = classify(Ok(payload(false, json!([{"is_active": "true"}]))));

        assert_eq!(
            outcome,
            Outcome::Error {
                detail: "API returned success: false".to_string()
            }
        );
    }

    #[test]
    fn success_false_wins_over_item_list_contents() {
        // Even a perfectly valid item list is ignored once the upstream
        // flags the request as failed.
        let outcome = classify(Ok(payload(
            false,
            json!([{"is_active": "true", "price": "1999"}]),
        )));
        assert!(matches!(outcome, Outcome::Error { .. }));
    }

    // ---- rule 3: stale identifier ----

    #[test]
    fn null_list_map_yields_not_found() {
        assert_eq!(classify(Ok(payload(true, Value::Null))), Outcome::NotFound);
    }

    // ---- rule 4: malformed payload ----

    #[test]
    fn empty_list_map_yields_error() {
        assert_eq!(
            classify(Ok(payload(true, json!([])))),
            Outcome::Error {
                detail: "listMap is empty or not an array".to_string()
            }
        );
    }

    #[test]
    fn non_array_list_map_yields_error() {
        for wrong in [json!({}), json!("nope"), json!(42), json!(true)] {
            assert_eq!(
                classify(Ok(payload(true, wrong))),
                Outcome::Error {
                    detail: "listMap is empty or not an array".to_string()
                }
            );
        }
    }

    // ---- rule 5: availability flag + price ----

    #[test]
    fn is_active_true_string_yields_available_with_price() {
        let outcome = classify(Ok(payload(
            true,
            json!([{"is_active": "true", "price": "1999"}]),
        )));
        assert_eq!(
            outcome,
            Outcome::Available {
                price: Some("1999".to_string())
            }
        );
    }

    #[test]
    fn is_active_false_string_yields_unavailable_with_price() {
        let outcome = classify(Ok(payload(
            true,
            json!([{"is_active": "false", "price": "1999"}]),
        )));
        assert_eq!(
            outcome,
            Outcome::Unavailable {
                price: Some("1999".to_string())
            }
        );
    }

    #[test]
    fn non_string_activity_flags_are_inactive_not_errors() {
        for flag in [json!(true), json!(1), json!(null)] {
            let outcome = classify(Ok(payload(
                true,
                json!([{"is_active": flag, "price": "500"}]),
            )));
            assert!(
                matches!(outcome, Outcome::Unavailable { .. }),
                "flag {:?} should read as inactive",
                flag
            );
        }
    }

    #[test]
    fn absent_activity_flag_yields_unavailable() {
        let outcome = classify(Ok(payload(true, json!([{"price": "500"}]))));
        assert_eq!(
            outcome,
            Outcome::Unavailable {
                price: Some("500".to_string())
            }
        );
    }

    #[test]
    fn numeric_price_is_stringified() {
        let outcome = classify(Ok(payload(
            true,
            json!([{"is_active": "true", "price": 1999}]),
        )));
        assert_eq!(
            outcome,
            Outcome::Available {
                price: Some("1999".to_string())
            }
        );
    }

    #[test]
    fn missing_price_is_carried_as_none() {
        let outcome = classify(Ok(payload(true, json!([{"is_active": "true"}]))));
        assert_eq!(outcome, Outcome::Available { price: None });
    }

    #[test]
    fn only_first_item_is_considered() {
        let outcome = classify(Ok(payload(
            true,
            json!([
                {"is_active": "false", "price": "100"},
                {"is_active": "true", "price": "200"}
            ]),
        )));
        assert_eq!(
            outcome,
            Outcome::Unavailable {
                price: Some("100".to_string())
            }
        );
    }
}
