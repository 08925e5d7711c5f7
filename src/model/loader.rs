use super::{BertSentimentClassifier, Classifier, ModelInfo, ModelState};
use crate::{Error, Result, config::ModelConfig};
use candle_core::Device;
use std::{path::Path, sync::Arc};
use tracing::{error, info};

/// Builds the classifier from a local model directory.
pub fn load_classifier(model_path: &str) -> Result<Arc<dyn Classifier>> {
    let dir = Path::new(model_path);
    if !dir.exists() {
        return Err(Error::load(format!(
            "Model directory '{}' does not exist.",
            model_path
        )));
    }

    let classifier = BertSentimentClassifier::load(dir, Device::Cpu)?;
    Ok(Arc::new(classifier))
}

/// Loads the configured model into `state`.
///
/// Failures are logged and leave `state` unset; the caller keeps running degraded.
pub fn load_into(state: &ModelState, config: &ModelConfig) -> bool {
    match load_classifier(&config.path) {
        Ok(classifier) => {
            let installed = state.install(classifier, ModelInfo::new(&config.path));
            if installed {
                info!("Model loaded successfully from {}", config.path);
            }
            installed
        }
        Err(e) => {
            error!("Error loading model: {}", e);
            false
        }
    }
}
