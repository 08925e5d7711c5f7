//! Sentiment classifier abstraction and the loaded-model state shared by the API.
//!
//! A [`Classifier`] maps one text to a ranked list of [`Prediction`]s. The API holds
//! it inside a [`ModelState`], which starts empty and is filled at most once by
//! [`loader::load_into`].

mod bert;
pub mod loader;

pub use bert::BertSentimentClassifier;

use crate::Result;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};

/// Fixed label set, indexed by classifier output position.
pub const LABELS: [&str; 2] = ["Negative", "Positive"];

pub const NUM_LABELS: usize = LABELS.len();

/// One label with its probability.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    /// Probability in `[0, 1]`.
    pub score: f32,
}

/// Blocking text classifier.
///
/// Implementations return predictions best first. An empty vector is treated by
/// callers as an inference failure.
pub trait Classifier: Send + Sync {
    fn classify(&self, text: &str) -> Result<Vec<Prediction>>;
}

/// Static metadata describing the loaded model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_path: String,
    pub num_labels: usize,
    pub labels: Vec<String>,
}

impl ModelInfo {
    pub fn new(model_path: impl Into<String>) -> Self {
        Self {
            model_path: model_path.into(),
            num_labels: NUM_LABELS,
            labels: LABELS.iter().map(|label| label.to_string()).collect(),
        }
    }
}

struct LoadedModel {
    classifier: Arc<dyn Classifier>,
    info: ModelInfo,
}

/// Classifier handle plus metadata. Unset until [`ModelState::install`] succeeds,
/// then fixed for the lifetime of the process.
#[derive(Default)]
pub struct ModelState {
    loaded: OnceLock<LoadedModel>,
}

impl ModelState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor for an already-loaded state.
    pub fn with_classifier(classifier: Arc<dyn Classifier>, info: ModelInfo) -> Self {
        let state = Self::new();
        state.install(classifier, info);
        state
    }

    /// Sets the handle. Returns `false` if one was already installed, in which
    /// case the existing classifier is kept.
    pub fn install(&self, classifier: Arc<dyn Classifier>, info: ModelInfo) -> bool {
        self.loaded.set(LoadedModel { classifier, info }).is_ok()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.get().is_some()
    }

    pub fn classifier(&self) -> Option<Arc<dyn Classifier>> {
        self.loaded.get().map(|loaded| Arc::clone(&loaded.classifier))
    }

    pub fn info(&self) -> Option<&ModelInfo> {
        self.loaded.get().map(|loaded| &loaded.info)
    }
}

impl std::fmt::Debug for ModelState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelState")
            .field("loaded", &self.is_loaded())
            .field("info", &self.info())
            .finish()
    }
}

/// `round(score * 100, 2)`.
pub fn confidence_percentage(score: f64) -> f64 {
    (score * 100.0 * 100.0).round() / 100.0
}
