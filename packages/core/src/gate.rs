//! Notification gate.
//!
//! Two independent switches (stock notifications and error
//! notifications), both on by default, flipped only by explicit bot
//! commands. The gate controls outbound messages only; the ledger is
//! always updated regardless of gate state.
//!
//! Toggles arrive from the bot task while the scheduler task reads, so
//! each switch is a single `AtomicBool`: a flip is one atomic op,
//! concurrent flips interleave but each is independently well-defined.

use std::sync::atomic::{AtomicBool, Ordering};

/// Gate switches, shared via `Arc` between the bot and the scheduler.
#[derive(Debug)]
pub struct NotificationGate {
    stock: AtomicBool,
    errors: AtomicBool,
}

impl NotificationGate {
    pub fn new() -> Self {
        Self {
            stock: AtomicBool::new(true),
            errors: AtomicBool::new(true),
        }
    }

    /// Flip the stock switch, returning the new state for display.
    pub fn toggle_stock(&self) -> bool {
        !self.stock.fetch_xor(true, Ordering::SeqCst)
    }

    /// Flip the error switch, returning the new state for display.
    pub fn toggle_errors(&self) -> bool {
        !self.errors.fetch_xor(true, Ordering::SeqCst)
    }

    pub fn stock_enabled(&self) -> bool {
        self.stock.load(Ordering::SeqCst)
    }

    pub fn errors_enabled(&self) -> bool {
        self.errors.load(Ordering::SeqCst)
    }
}

impl Default for NotificationGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn both_switches_default_to_enabled() {
        let gate = NotificationGate::new();
        assert!(gate.stock_enabled());
        assert!(gate.errors_enabled());
    }

    #[test]
    fn toggle_stock_returns_the_new_state() {
        let gate = NotificationGate::new();
        assert!(!gate.toggle_stock());
        assert!(!gate.stock_enabled());
        assert!(gate.toggle_stock());
        assert!(gate.stock_enabled());
    }

    #[test]
    fn switches_are_independent() {
        let gate = NotificationGate::new();
        gate.toggle_stock();
        assert!(!gate.stock_enabled());
        assert!(gate.errors_enabled());

        gate.toggle_errors();
        assert!(!gate.errors_enabled());
        assert!(!gate.stock_enabled());
    }

    proptest! {
        #[test]
        fn toggle_parity_matches_default(count in 0usize..64) {
            let gate = NotificationGate::new();
            for _ in 0..count {
                gate.toggle_stock();
            }
            // Even number of flips lands back on the default (true).
            prop_assert_eq!(gate.stock_enabled(), count % 2 == 0);
        }
    }
}
