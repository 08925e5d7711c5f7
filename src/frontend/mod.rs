//! Server-rendered web UI for manual testing of the prediction service.
//!
//! Talks to the API only over HTTP through [`ApiClient`]. Three tabs: single text,
//! batch (posts to `/batch_predict`), and a fixed example gallery.

mod client;
pub mod handlers;
pub mod views;

pub use client::{ApiClient, BATCH_TIMEOUT, BatchResponse, HEALTH_TIMEOUT, PREDICT_TIMEOUT};

use crate::{Result, config::FrontendConfig};
use axum::{
    Router,
    routing::{get, post},
};
use minijinja::Environment;
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::info;

const TEMPLATES: [(&str, &str); 5] = [
    ("layout.html", include_str!("templates/layout.html")),
    ("macros.html", include_str!("templates/macros.html")),
    ("single.html", include_str!("templates/single.html")),
    ("batch.html", include_str!("templates/batch.html")),
    ("examples.html", include_str!("templates/examples.html")),
];

#[derive(Clone)]
pub struct FrontendState {
    pub client: ApiClient,
    pub templates: Arc<Environment<'static>>,
}

impl FrontendState {
    pub fn new(client: ApiClient) -> Result<Self> {
        Ok(Self {
            client,
            templates: Arc::new(templates()?),
        })
    }
}

pub fn templates() -> Result<Environment<'static>> {
    let mut env = Environment::new();
    for (name, source) in TEMPLATES {
        env.add_template(name, source)?;
    }
    Ok(env)
}

pub fn router(state: FrontendState) -> Router {
    Router::new()
        .route("/", get(handlers::single_page))
        .route("/analyze", post(handlers::analyze))
        .route("/batch", get(handlers::batch_page).post(handlers::analyze_batch))
        .route("/examples", get(handlers::examples_page))
        .route("/examples/:index", post(handlers::analyze_example))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: FrontendConfig) -> Result<()> {
    let client = ApiClient::new(&config.api_base_url);
    info!("Using prediction API at {}", client.base_url());

    let app = router(FrontendState::new(client)?);

    let addr = SocketAddr::new(config.host.parse()?, config.port);

    info!("Starting frontend on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
