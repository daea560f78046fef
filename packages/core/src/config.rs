use std::env;

use crate::cli::Cli;

/// Runtime configuration, read once at startup.
///
/// `SKUS` and `TELEGRAM_BOT_TOKEN` are required; everything else has a
/// default. A missing required value is fatal: the process exits
/// non-zero from `main` rather than limping along half-configured.
#[derive(Debug, Clone)]
pub struct Config {
    /// SKU identifiers to watch, in round-robin / report order.
    pub skus: Vec<String>,
    pub poll_interval_seconds: u64,
    pub locale: String,
    pub telegram_bot_token: String,
    /// Destination chat. When absent, notifications are logged locally
    /// instead of dispatched.
    pub telegram_chat_id: Option<String>,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let skus: Vec<String> = env::var("SKUS")
            .map_err(|_| "SKUS is required")?
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if skus.is_empty() {
            return Err("SKUS must contain at least one identifier".to_string());
        }

        let poll_interval_seconds = match env::var("POLL_INTERVAL_SECONDS") {
            Ok(raw) => parse_poll_interval(&raw)?,
            Err(_) => 30,
        };

        let locale = env::var("LOCALE").unwrap_or_else(|_| "en-us".to_string());

        let telegram_bot_token =
            env::var("TELEGRAM_BOT_TOKEN").map_err(|_| "TELEGRAM_BOT_TOKEN is required")?;

        let telegram_chat_id = env::var("TELEGRAM_CHAT_ID").ok();

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| "PORT must be a valid port number")?,
            Err(_) => 8080,
        };

        Ok(Self {
            skus,
            poll_interval_seconds,
            locale,
            telegram_bot_token,
            telegram_chat_id,
            port,
        })
    }

    /// CLI flags win over environment values. The `--poll-interval`
    /// flag rejects zero at parse time (clap range validator), so no
    /// re-check is needed here.
    pub fn apply_cli(mut self, cli: &Cli) -> Self {
        if let Some(locale) = &cli.locale {
            self.locale = locale.clone();
        }
        if let Some(interval) = cli.poll_interval {
            self.poll_interval_seconds = interval;
        }
        if let Some(port) = cli.port {
            self.port = port;
        }
        self
    }
}

/// A zero interval would panic inside `tokio::time::interval`, so it is
/// rejected here with the same fatal-config treatment as a non-number.
fn parse_poll_interval(raw: &str) -> Result<u64, String> {
    let seconds = raw
        .parse::<u64>()
        .map_err(|_| "POLL_INTERVAL_SECONDS must be a valid number".to_string())?;
    if seconds == 0 {
        return Err("POLL_INTERVAL_SECONDS must be greater than zero".to_string());
    }
    Ok(seconds)
}
