use super::client::BatchResponse;
use crate::server::types::PredictionResponse;
use serde::Serialize;

pub const EXAMPLES: [&str; 8] = [
    "I absolutely love this movie! It's fantastic!",
    "This was the worst experience ever. Completely disappointed.",
    "The weather is okay today, nothing special.",
    "Amazing product! Highly recommend to everyone!",
    "Not sure how I feel about this...",
    "This restaurant has great food and excellent service!",
    "The movie was boring and too long.",
    "I'm feeling neutral about this decision.",
];

const POSITIVE_COLOR: &str = "#28a745";
const NEGATIVE_COLOR: &str = "#dc3545";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBand {
    High,
    Moderate,
    Low,
}

impl ConfidenceBand {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 80.0 {
            Self::High
        } else if percentage >= 60.0 {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::High => "🎯 High confidence prediction!",
            Self::Moderate => "📊 Moderate confidence prediction",
            Self::Low => "⚠️ Low confidence prediction",
        }
    }

    /// Alert style used by the templates.
    pub fn css_class(self) -> &'static str {
        match self {
            Self::High => "success",
            Self::Moderate => "info",
            Self::Low => "warning",
        }
    }
}

/// A prediction prepared for display.
#[derive(Debug, Clone, Serialize)]
pub struct SentimentView {
    pub text: String,
    pub label: String,
    pub score: f64,
    pub score_display: String,
    pub confidence: f64,
    pub confidence_short: String,
    pub is_positive: bool,
    pub color: &'static str,
    pub emoji: &'static str,
    pub band: ConfidenceBand,
    pub band_message: &'static str,
    pub band_class: &'static str,
}

impl From<PredictionResponse> for SentimentView {
    fn from(prediction: PredictionResponse) -> Self {
        let is_positive = prediction.label == "Positive";
        let band = ConfidenceBand::from_percentage(prediction.confidence_percentage);
        Self {
            score_display: format!("{:.4}", prediction.score),
            confidence_short: format!("{:.1}", prediction.confidence_percentage),
            text: prediction.text,
            label: prediction.label,
            score: prediction.score,
            confidence: prediction.confidence_percentage,
            is_positive,
            color: if is_positive { POSITIVE_COLOR } else { NEGATIVE_COLOR },
            emoji: if is_positive { "😊" } else { "😞" },
            band,
            band_message: band.message(),
            band_class: band.css_class(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub positive: usize,
    pub negative: usize,
}

impl BatchSummary {
    pub fn of(predictions: &[PredictionResponse]) -> Self {
        let positive = predictions.iter().filter(|p| p.label == "Positive").count();
        Self {
            total: predictions.len(),
            positive,
            negative: predictions.len() - positive,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchView {
    pub summary: BatchSummary,
    pub results: Vec<SentimentView>,
}

impl From<BatchResponse> for BatchView {
    fn from(response: BatchResponse) -> Self {
        Self {
            summary: BatchSummary::of(&response.predictions),
            results: response.predictions.into_iter().map(Into::into).collect(),
        }
    }
}

fn non_empty_lines(content: &str) -> impl Iterator<Item = String> + '_ {
    content
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
}

/// Lines from the uploaded file first, then lines typed into the text area.
pub fn collect_batch_texts(file_content: Option<&str>, manual: &str) -> Vec<String> {
    let mut texts: Vec<String> = file_content.map(non_empty_lines).into_iter().flatten().collect();
    texts.extend(non_empty_lines(manual));
    texts
}
