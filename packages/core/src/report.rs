//! Status report rendering.
//!
//! Formats a ledger snapshot plus process uptime into the text block
//! the `/status` command replies with. Rendering is pure ("now" is a
//! parameter) so tests never race the clock.

use chrono::{DateTime, Duration, Utc};

use crate::classifier::{CheckRecord, Outcome};

/// Build the full status text: one uptime line, then one line per SKU
/// in configured order. Before any check has completed, a single
/// "collecting data" line stands in for the per-SKU block.
pub fn render_status(
    snapshot: &[(String, Option<CheckRecord>)],
    started_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> String {
    let mut lines = vec![format!("Uptime: {}", humanize(now - started_at))];

    if snapshot.iter().all(|(_, record)| record.is_none()) {
        lines.push("Still collecting data — no checks have completed yet.".to_string());
        return lines.join("\n");
    }

    for (sku, record) in snapshot {
        lines.push(sku_line(sku, record.as_ref(), now));
    }

    lines.join("\n")
}

fn sku_line(sku: &str, record: Option<&CheckRecord>, now: DateTime<Utc>) -> String {
    let record = match record {
        Some(r) => r,
        None => return format!("{}: no data yet", sku),
    };

    let age = format!("{} ago", humanize(now - record.observed_at));
    match &record.outcome {
        Outcome::Available { price } => format!(
            "{}: IN STOCK at {} ({})",
            sku,
            price.as_deref().unwrap_or("unknown price"),
            age
        ),
        Outcome::Unavailable { price } => match price {
            Some(price) => format!("{}: out of stock, listed at {} ({})", sku, price, age),
            None => format!("{}: out of stock ({})", sku, age),
        },
        Outcome::NotFound => format!("{}: not found — SKU may be stale ({})", sku, age),
        Outcome::Error { detail } => format!("{}: check failed: {} ({})", sku, detail, age),
    }
}

/// Compact relative-duration phrase: seconds under a minute, then the
/// two most significant units.
fn humanize(duration: Duration) -> String {
    let secs = duration.num_seconds().max(0);
    let (days, rem) = (secs / 86_400, secs % 86_400);
    let (hours, rem) = (rem / 3_600, rem % 3_600);
    let (mins, secs) = (rem / 60, rem % 60);

    if days > 0 {
        format!("{}d {}h", days, hours)
    } else if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else if mins > 0 {
        format!("{}m {}s", mins, secs)
    } else {
        format!("{}s", secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_at(outcome: Outcome, now: DateTime<Utc>, secs_ago: i64) -> CheckRecord {
        CheckRecord {
            observed_at: now - Duration::seconds(secs_ago),
            outcome,
        }
    }

    #[test]
    fn empty_ledger_renders_collecting_data_line() {
        let now = Utc::now();
        let snapshot = vec![
            ("16207".to_string(), None),
            ("20667".to_string(), None),
        ];

        let report = render_status(&snapshot, now - Duration::seconds(90), now);
        let lines: Vec<&str> = report.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "Uptime: 1m 30s");
        assert!(lines[1].contains("collecting data"));
    }

    #[test]
    fn renders_one_line_per_sku_in_configured_order() {
        let now = Utc::now();
        let snapshot = vec![
            (
                "16207".to_string(),
                Some(record_at(
                    Outcome::Available {
                        price: Some("1999".to_string()),
                    },
                    now,
                    5,
                )),
            ),
            ("20667".to_string(), None),
            (
                "31999".to_string(),
                Some(record_at(Outcome::NotFound, now, 125)),
            ),
        ];

        let report = render_status(&snapshot, now - Duration::hours(2), now);
        let lines: Vec<&str> = report.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "16207: IN STOCK at 1999 (5s ago)");
        assert_eq!(lines[2], "20667: no data yet");
        assert_eq!(lines[3], "31999: not found — SKU may be stale (2m 5s ago)");
    }

    #[test]
    fn error_line_includes_the_detail() {
        let now = Utc::now();
        let snapshot = vec![(
            "16207".to_string(),
            Some(record_at(
                Outcome::Error {
                    detail: "API returned success: false".to_string(),
                },
                now,
                10,
            )),
        )];

        let report = render_status(&snapshot, now, now);
        assert!(report.contains("16207: check failed: API returned success: false (10s ago)"));
    }

    #[test]
    fn out_of_stock_line_carries_known_price() {
        let now = Utc::now();
        let snapshot = vec![(
            "16207".to_string(),
            Some(record_at(
                Outcome::Unavailable {
                    price: Some("1999".to_string()),
                },
                now,
                0,
            )),
        )];

        let report = render_status(&snapshot, now, now);
        assert!(report.contains("out of stock, listed at 1999"));
    }

    #[test]
    fn humanize_picks_the_two_most_significant_units() {
        assert_eq!(humanize(Duration::seconds(42)), "42s");
        assert_eq!(humanize(Duration::seconds(61)), "1m 1s");
        assert_eq!(humanize(Duration::seconds(3_600 + 300)), "1h 5m");
        assert_eq!(humanize(Duration::seconds(2 * 86_400 + 3 * 3_600)), "2d 3h");
    }

    #[test]
    fn humanize_clamps_negative_durations_to_zero() {
        assert_eq!(humanize(Duration::seconds(-5)), "0s");
    }
}
