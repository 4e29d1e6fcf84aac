use anyhow::Result;
use clap::Parser;
use tracing::info;

use restock_watcher::config::AppConfig;
use restock_watcher::monitor::Monitor;

#[derive(Parser, Debug)]
#[command(
    name = "restock-watcher",
    about = "Product restock monitoring with email and Telegram alerts",
    version
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Run one check pass and exit (also enabled with SINGLE_CHECK=true)
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("restock_watcher=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(&cli.config)?;
    info!(products = config.products.len(), "configuration loaded");

    let single_check = cli.once || AppConfig::single_check_requested();
    let mut monitor = Monitor::new(config)?;

    if single_check {
        monitor.run_once().await;
    } else {
        monitor.run().await;
    }

    Ok(())
}
