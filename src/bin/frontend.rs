use anyhow::Result;
use sentiment_service::{config, frontend, telemetry};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = match config::load().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = telemetry::init(&config.logs) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    info!("Starting sentiment frontend");

    frontend::run(config.frontend).await?;

    Ok(())
}
