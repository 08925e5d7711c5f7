use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use candle_core::{DType, Device};
use candle_nn::{VarBuilder, VarMap, linear};
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use sentiment_service::{
    model::{Classifier, ModelInfo, ModelState},
    server::{self, handlers::AppState},
};
use serde_json::Value;
use std::{path::Path, sync::Arc};

pub const TEST_MODEL_PATH: &str = "model";

/// Router backed by `classifier`, or an unloaded router for `None`.
pub fn create_test_app<C: Classifier + 'static>(classifier: Option<C>) -> Router {
    let model = match classifier {
        Some(classifier) => {
            ModelState::with_classifier(Arc::new(classifier), ModelInfo::new(TEST_MODEL_PATH))
        }
        None => ModelState::new(),
    };
    server::router(AppState::new(model))
}

pub fn unloaded_app() -> Router {
    server::router(AppState::new(ModelState::new()))
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn predict_request(text: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::json!({ "text": text }).to_string()))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Serves `app` on an ephemeral local port and returns its base URL.
pub async fn spawn_app(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

pub const TINY_BERT_CONFIG: &str = r#"{
  "architectures": ["BertForSequenceClassification"],
  "model_type": "bert",
  "vocab_size": 16,
  "hidden_size": 8,
  "num_hidden_layers": 1,
  "num_attention_heads": 2,
  "intermediate_size": 16,
  "hidden_act": "gelu",
  "hidden_dropout_prob": 0.1,
  "attention_probs_dropout_prob": 0.1,
  "max_position_embeddings": 32,
  "type_vocab_size": 2,
  "initializer_range": 0.02,
  "layer_norm_eps": 1e-12,
  "pad_token_id": 0,
  "position_embedding_type": "absolute",
  "use_cache": true,
  "classifier_dropout": null,
  "id2label": { "0": "Negative", "1": "Positive" },
  "label2id": { "Negative": 0, "Positive": 1 }
}"#;

pub const TINY_TOKENIZER: &str = r#"{
  "version": "1.0",
  "truncation": null,
  "padding": null,
  "added_tokens": [],
  "normalizer": { "type": "Lowercase" },
  "pre_tokenizer": { "type": "Whitespace" },
  "post_processor": {
    "type": "BertProcessing",
    "sep": ["[SEP]", 2],
    "cls": ["[CLS]", 1]
  },
  "decoder": null,
  "model": {
    "type": "WordLevel",
    "vocab": {
      "[UNK]": 0, "[CLS]": 1, "[SEP]": 2, "i": 3, "love": 4, "this": 5,
      "hate": 6, "it": 7, "!": 8, "movie": 9, "was": 10, "great": 11,
      "boring": 12, "the": 13, ".": 14, "okay": 15
    },
    "unk_token": "[UNK]"
  }
}"#;

/// Writes a randomly initialised two-label BERT checkpoint into `dir`.
pub fn write_tiny_bert(dir: &Path) {
    std::fs::write(dir.join("config.json"), TINY_BERT_CONFIG).unwrap();
    std::fs::write(dir.join("tokenizer.json"), TINY_TOKENIZER).unwrap();

    let config: BertConfig = serde_json::from_str(TINY_BERT_CONFIG).unwrap();
    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
    BertModel::load(vb.pp("bert"), &config).unwrap();
    linear(8, 8, vb.pp("bert.pooler.dense")).unwrap();
    linear(8, 2, vb.pp("classifier")).unwrap();
    varmap.save(dir.join("model.safetensors")).unwrap();
}
