//! Classifier traits and common types

use async_trait::async_trait;
use reviewsense_core::{Result, SentimentLabel};

/// A sentiment classifier as seen by the orchestrator.
///
/// Callers skip empty input; behavior on blank text is unspecified here.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify the given text
    async fn classify(&self, text: &str) -> Result<SentimentLabel>;

    /// Get the classifier name
    fn name(&self) -> &str;
}

/// A pretrained scoring model with its own label vocabulary.
#[async_trait]
pub trait SentimentModel: Send + Sync {
    /// Score the given text, returning the model's native label
    async fn predict(&self, text: &str) -> Result<ModelOutput>;

    /// Get the model name
    fn name(&self) -> &str;
}

/// Raw output of a [`SentimentModel`]
#[derive(Debug, Clone)]
pub struct ModelOutput {
    /// Label as the model spells it (e.g. `POSITIVE`, `LABEL_1`)
    pub label: String,

    /// Confidence score (0.0-1.0)
    pub score: f32,

    /// Latency in microseconds
    pub latency_us: u64,
}

impl ModelOutput {
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
            latency_us: 0,
        }
    }
}
