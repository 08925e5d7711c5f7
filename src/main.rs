use anyhow::Result;
use sentiment_service::{config, server, telemetry};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (before logging setup)
    let config = match config::load().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let log_level = match telemetry::init(&config.logs) {
        Ok(level) => level,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    info!("Starting sentiment API with log level: {}", log_level);
    info!("Model directory: {}", config.model.path);

    server::run(config).await?;

    Ok(())
}
