use super::types::{
    ErrorResponse, HealthResponse, PredictionRequest, PredictionResponse, StatusResponse,
};
use crate::{
    Error,
    model::{ModelState, confidence_percentage},
};
use axum::{extract::State, http::StatusCode, response::Json};
use std::sync::Arc;
use tracing::{error, info};

pub const STATUS_MESSAGE: &str = "Sentiment Analysis API is running.";

#[derive(Clone)]
pub struct AppState {
    pub model: Arc<ModelState>,
}

impl AppState {
    pub fn new(model: ModelState) -> Self {
        Self {
            model: Arc::new(model),
        }
    }
}

type ErrorReply = (StatusCode, Json<ErrorResponse>);

fn reply(status: StatusCode, detail: &str) -> ErrorReply {
    (
        status,
        Json(ErrorResponse {
            detail: detail.to_string(),
        }),
    )
}

fn model_not_loaded() -> ErrorReply {
    reply(StatusCode::SERVICE_UNAVAILABLE, "Model not loaded")
}

pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        message: STATUS_MESSAGE.to_string(),
        model_info: state.model.info().cloned(),
        model_loaded: state.model.is_loaded(),
    })
}

pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ErrorReply> {
    if !state.model.is_loaded() {
        return Err(model_not_loaded());
    }
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        model_loaded: true,
    }))
}

pub async fn predict(
    State(state): State<AppState>,
    Json(request): Json<PredictionRequest>,
) -> Result<Json<PredictionResponse>, ErrorReply> {
    let classifier = state.model.classifier().ok_or_else(model_not_loaded)?;

    let text = request.text;
    let input = text.clone();
    let outcome = tokio::task::spawn_blocking(move || classifier.classify(&input))
        .await
        .map_err(|e| Error::internal(format!("Inference task failed: {}", e)))
        .and_then(|result| result)
        .and_then(|predictions| {
            predictions
                .into_iter()
                .next()
                .ok_or_else(|| Error::inference("Classifier returned no predictions"))
        });

    match outcome {
        Ok(top) => {
            let score = f64::from(top.score);
            info!("Predicted {} ({:.4}) for {} chars", top.label, score, text.len());
            Ok(Json(PredictionResponse {
                text,
                label: top.label,
                score,
                confidence_percentage: confidence_percentage(score),
            }))
        }
        Err(e) => {
            error!("Prediction error: {}", e);
            Err(reply(StatusCode::INTERNAL_SERVER_ERROR, "Prediction error"))
        }
    }
}
