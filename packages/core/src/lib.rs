// Library root — exposes internal modules for integration tests in `tests/`.
// Production entry point remains `src/main.rs`.

pub mod alerts;
pub mod api;
pub mod bot;
pub mod classifier;
pub mod error;
pub mod gate;
pub mod ledger;
pub mod metrics;
pub mod report;
pub mod scheduler;
pub mod services;

// These modules are only needed by the binary.
// Declared pub so integration tests can reach them if needed, but they
// contain no logic of interest to tests.
pub mod cli;
pub mod config;
pub mod logging;
