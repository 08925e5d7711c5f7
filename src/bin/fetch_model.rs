use sentiment_service::{config, registry, telemetry};
use tracing::error;

#[tokio::main]
async fn main() {
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

    if let Err(e) = registry::run(&config.registry).await {
        error!("Error while downloading the model: {}", e);
        eprintln!("Error while downloading the model: {}", e);
        std::process::exit(1);
    }
}
