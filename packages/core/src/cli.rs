use clap::Parser;

/// Restock Watcher CLI arguments
#[derive(Debug, Parser)]
#[command(
    name = "restock-watcher",
    version,
    about = "Polls an inventory API and pings Telegram when tracked SKUs come back in stock"
)]
pub struct Cli {
    /// Store locale used for the inventory query and the buy link
    #[arg(long)]
    pub locale: Option<String>,

    /// Stock polling interval in seconds (must be at least 1)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_interval: Option<u64>,

    /// Keep-alive server port
    #[arg(long)]
    pub port: Option<u16>,
}
