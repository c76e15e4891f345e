//! limitq bot entry point.
//!
//! Polls a spreadsheet order queue and places after-market limit orders
//! against the venue, marking each row once placed.

use anyhow::Result;
use clap::Parser;
use tracing::info;

/// Sheet-driven limit order placement bot
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via LIMITQ_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    limitq_telemetry::init_logging()?;

    info!("Starting limitq bot v{}", env!("CARGO_PKG_VERSION"));

    let config_path = args
        .config
        .or_else(|| std::env::var(limitq_bot::config::CONFIG_ENV).ok())
        .unwrap_or_else(|| "config/default.toml".to_string());

    info!(config_path = %config_path, "Loading configuration");
    let config = limitq_bot::AppConfig::from_file(&config_path)?;

    let app = limitq_bot::Application::bootstrap(config).await?;
    app.run().await?;

    Ok(())
}
