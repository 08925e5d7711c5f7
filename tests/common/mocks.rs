use async_trait::async_trait;
use mockall::mock;
use sentiment_service::{
    Error, Result,
    model::{Classifier, Prediction},
    registry::{ArtifactFile, ArtifactManifest, ArtifactRef, ArtifactRegistry, Viewer},
};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

mock! {
    pub Classifier {}

    impl Classifier for Classifier {
        fn classify(&self, text: &str) -> Result<Vec<Prediction>>;
    }
}

pub fn prediction(label: &str, score: f32) -> Prediction {
    Prediction {
        label: label.to_string(),
        score,
    }
}

/// Classifier that always answers with the same ranked predictions.
pub fn fixed_classifier(label: &str, score: f32) -> MockClassifier {
    let other = if label == "Positive" { "Negative" } else { "Positive" };
    let predictions = vec![prediction(label, score), prediction(other, 1.0 - score)];
    let mut mock = MockClassifier::new();
    mock.expect_classify()
        .returning(move |_| Ok(predictions.clone()));
    mock
}

/// Positive when the text mentions "love", otherwise negative.
pub fn keyword_classifier() -> MockClassifier {
    let mut mock = MockClassifier::new();
    mock.expect_classify().returning(|text| {
        if text.to_lowercase().contains("love") {
            Ok(vec![prediction("Positive", 0.95), prediction("Negative", 0.05)])
        } else {
            Ok(vec![prediction("Negative", 0.7), prediction("Positive", 0.3)])
        }
    });
    mock
}

pub fn failing_classifier(message: &str) -> MockClassifier {
    let message = message.to_string();
    let mut mock = MockClassifier::new();
    mock.expect_classify()
        .returning(move |_| Err(Error::inference(message.clone())));
    mock
}

pub fn empty_classifier() -> MockClassifier {
    let mut mock = MockClassifier::new();
    mock.expect_classify().returning(|_| Ok(Vec::new()));
    mock
}

/// In-memory registry that serves a fixed set of files.
#[derive(Debug, Default)]
pub struct MockRegistry {
    pub viewer: Option<Viewer>,
    pub files: HashMap<String, Vec<u8>>,
    pub resolve_error: Option<String>,
    pub resolved: Arc<Mutex<Vec<ArtifactRef>>>,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self {
            viewer: Some(Viewer {
                username: Some("tester".to_string()),
                entity: Some("tester-team".to_string()),
            }),
            ..Self::default()
        }
    }

    pub fn with_file(mut self, name: &str, content: &[u8]) -> Self {
        self.files.insert(name.to_string(), content.to_vec());
        self
    }

    pub fn unauthenticated(mut self) -> Self {
        self.viewer = None;
        self
    }

    pub fn with_resolve_error(mut self, message: &str) -> Self {
        self.resolve_error = Some(message.to_string());
        self
    }

    pub fn resolved(&self) -> Vec<ArtifactRef> {
        self.resolved.lock().unwrap().clone()
    }
}

#[async_trait]
impl ArtifactRegistry for MockRegistry {
    async fn authenticate(&self) -> Result<Viewer> {
        self.viewer
            .clone()
            .ok_or_else(|| Error::registry("Authentication failed: invalid API key"))
    }

    async fn resolve(&self, artifact: &ArtifactRef) -> Result<ArtifactManifest> {
        self.resolved.lock().unwrap().push(artifact.clone());
        if let Some(ref message) = self.resolve_error {
            return Err(Error::registry(message.clone()));
        }
        let mut names: Vec<&String> = self.files.keys().collect();
        names.sort();
        Ok(ArtifactManifest {
            id: "artifact-1".to_string(),
            digest: Some("abc123".to_string()),
            files: names
                .into_iter()
                .map(|name| ArtifactFile {
                    name: name.clone(),
                    direct_url: format!("mock://{}", name),
                    size_bytes: Some(self.files[name].len() as u64),
                })
                .collect(),
        })
    }

    async fn download(&self, file: &ArtifactFile, dest: &Path) -> Result<u64> {
        let content = self
            .files
            .get(&file.name)
            .ok_or_else(|| Error::registry(format!("No such file {}", file.name)))?;
        tokio::fs::write(dest, content).await?;
        Ok(content.len() as u64)
    }
}
