//! BERT sequence classifier on candle.
//!
//! Reads an exported `BertForSequenceClassification` checkpoint: `bert.*` encoder,
//! `bert.pooler.dense`, and a `classifier` head projecting to [`NUM_LABELS`] logits.

use super::{Classifier, LABELS, NUM_LABELS, Prediction};
use crate::{Error, Result};
use candle_core::{DType, Device, IndexOp, Tensor, D};
use candle_nn::{Linear, Module, VarBuilder, linear, ops::softmax};
use candle_transformers::models::bert::{BertModel, Config};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokenizers::Tokenizer;
use tracing::debug;

pub const CONFIG_FILE: &str = "config.json";
pub const TOKENIZER_FILE: &str = "tokenizer.json";
pub const SAFETENSORS_FILE: &str = "model.safetensors";
pub const PYTORCH_FILE: &str = "pytorch_model.bin";

#[derive(Deserialize)]
struct HeadConfig {
    hidden_size: usize,
}

pub struct BertSentimentClassifier {
    bert: BertModel,
    pooler: Linear,
    classifier: Linear,
    tokenizer: Tokenizer,
    device: Device,
}

impl BertSentimentClassifier {
    pub fn load(model_dir: &Path, device: Device) -> Result<Self> {
        let config_path = model_dir.join(CONFIG_FILE);
        let config_str = std::fs::read_to_string(&config_path).map_err(|e| {
            Error::load(format!("Failed to read '{}': {}", config_path.display(), e))
        })?;
        let config: Config = serde_json::from_str(&config_str)
            .map_err(|e| Error::load(format!("Invalid model config: {}", e)))?;
        let head: HeadConfig = serde_json::from_str(&config_str)
            .map_err(|e| Error::load(format!("Invalid model config: {}", e)))?;

        let tokenizer_path = model_dir.join(TOKENIZER_FILE);
        let tokenizer = Tokenizer::from_file(&tokenizer_path).map_err(|e| {
            Error::load(format!(
                "Failed to load tokenizer from '{}': {}",
                tokenizer_path.display(),
                e
            ))
        })?;

        let weights_path = weights_file(model_dir)?;
        debug!("Loading weights from {}", weights_path.display());

        let vb = if weights_path.extension().is_some_and(|e| e == "safetensors") {
            // SAFETY: the file is memory-mapped read-only and not modified while loaded.
            unsafe { VarBuilder::from_mmaped_safetensors(&[&weights_path], DType::F32, &device) }
        } else {
            VarBuilder::from_pth(&weights_path, DType::F32, &device)
        }
        .map_err(|e| Error::load(format!("Failed to read weights: {}", e)))?;

        let build = || -> candle_core::Result<(BertModel, Linear, Linear)> {
            let bert = BertModel::load(vb.pp("bert"), &config)?;
            let pooler = linear(head.hidden_size, head.hidden_size, vb.pp("bert.pooler.dense"))?;
            let classifier = linear(head.hidden_size, NUM_LABELS, vb.pp("classifier"))?;
            Ok((bert, pooler, classifier))
        };
        let (bert, pooler, classifier) =
            build().map_err(|e| Error::load(format!("Malformed weights: {}", e)))?;

        Ok(Self {
            bert,
            pooler,
            classifier,
            tokenizer,
            device,
        })
    }

    fn probabilities(&self, text: &str) -> Result<Vec<f32>> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| Error::inference(format!("Tokenization error: {}", e)))?;

        let forward = || -> candle_core::Result<Vec<f32>> {
            let input_ids = Tensor::new(encoding.get_ids(), &self.device)?.unsqueeze(0)?;
            let token_type_ids = Tensor::new(encoding.get_type_ids(), &self.device)?.unsqueeze(0)?;
            let attention_mask =
                Tensor::new(encoding.get_attention_mask(), &self.device)?.unsqueeze(0)?;

            let hidden = self
                .bert
                .forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
            let cls = hidden.i((.., 0))?;
            let pooled = self.pooler.forward(&cls)?.tanh()?;
            let logits = self.classifier.forward(&pooled)?;

            softmax(&logits, D::Minus1)?.squeeze(0)?.to_vec1::<f32>()
        };

        forward().map_err(|e| Error::inference(e.to_string()))
    }
}

impl Classifier for BertSentimentClassifier {
    fn classify(&self, text: &str) -> Result<Vec<Prediction>> {
        let probs = self.probabilities(text)?;
        Ok(rank(&probs))
    }
}

fn weights_file(model_dir: &Path) -> Result<PathBuf> {
    [SAFETENSORS_FILE, PYTORCH_FILE]
        .iter()
        .map(|name| model_dir.join(name))
        .find(|path| path.is_file())
        .ok_or_else(|| {
            Error::load(format!(
                "No {} or {} in '{}'",
                SAFETENSORS_FILE,
                PYTORCH_FILE,
                model_dir.display()
            ))
        })
}

/// Pairs probabilities with [`LABELS`], highest first.
fn rank(probs: &[f32]) -> Vec<Prediction> {
    let mut predictions: Vec<Prediction> = probs
        .iter()
        .zip(LABELS)
        .map(|(score, label)| Prediction {
            label: label.to_string(),
            score: *score,
        })
        .collect();
    predictions.sort_by(|a, b| b.score.total_cmp(&a.score));
    predictions
}
