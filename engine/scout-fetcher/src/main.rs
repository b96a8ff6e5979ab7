use anyhow::{Context, Result};
use scout_fetcher::{
    initialize_logging, setup_signal_handlers, CancellationToken, FetcherConfig, FetcherScheduler,
};
use std::path::PathBuf;
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Optional TOML file; everything else comes from defaults and SCOUT__* variables
    let config_path = std::env::var_os("SCOUT_CONFIG").map(PathBuf::from);
    let config =
        FetcherConfig::load(config_path.as_deref()).context("Failed to load configuration")?;

    initialize_logging(&config.logging)?;

    println!("{}", "=".repeat(40));
    println!("   CARTOLA SCOUT - COLLECTION BOT v{}", env!("CARGO_PKG_VERSION"));
    println!("   Status: RUNNING");
    println!("   Interval: {} hours", config.scheduler.interval_secs as f64 / 3600.0);
    println!("   Store: {}", config.store.path.display());
    println!("{}", "=".repeat(40));

    let shutdown = CancellationToken::new();
    setup_signal_handlers(shutdown.clone()).context("Failed to install signal handlers")?;

    let mut scheduler =
        FetcherScheduler::from_config(&config).context("Failed to create HTTP clients")?;

    scheduler.start(shutdown).await.context("Recommendation store setup failed")?;

    info!("Scout fetcher stopped");
    Ok(())
}
