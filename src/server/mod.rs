pub mod handlers;
pub mod types;

use crate::{
    Result,
    config::Config,
    model::{ModelState, loader},
};
use axum::{
    Router,
    routing::{get, post},
};
use handlers::AppState;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::status))
        .route("/health", get(handlers::health))
        .route("/predict", post(handlers::predict))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: Config) -> Result<()> {
    // Load before binding so no request observes a half-initialised model.
    let model = ModelState::new();
    let model_config = config.model.clone();
    let model = tokio::task::spawn_blocking(move || {
        if loader::load_into(&model, &model_config) {
            info!("Model loaded and ready for predictions.");
        } else {
            error!("Failed to load model on startup.");
        }
        model
    })
    .await
    .map_err(|e| crate::Error::internal(format!("Model loading task failed: {}", e)))?;

    let app = router(AppState::new(model));

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
