//! Contextual sentiment classifier
//!
//! Wraps a pretrained [`SentimentModel`] and maps its free-form label onto
//! [`SentimentLabel`]. Any label starting with `pos` (case-insensitive) is
//! positive; everything else, including `NEUTRAL`, is negative. The model's
//! confidence score is discarded.

use crate::classifier::{Classifier, SentimentModel};
use crate::config::{ContextualBackend, ContextualConfig};
use crate::sentiment::LexiconSentimentModel;
use async_trait::async_trait;
use reviewsense_core::{Error, Result, SentimentLabel};
use std::sync::Arc;

/// Map a model label onto the two-valued sentiment
pub fn normalize_label(label: &str) -> SentimentLabel {
    let is_positive = label
        .get(..3)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("pos"));

    if is_positive {
        SentimentLabel::Positive
    } else {
        SentimentLabel::Negative
    }
}

pub struct ContextualClassifier {
    name: String,
    model: Arc<dyn SentimentModel>,
}

impl ContextualClassifier {
    pub fn new(model: Arc<dyn SentimentModel>) -> Self {
        Self {
            name: format!("contextual:{}", model.name()),
            model,
        }
    }

    pub fn model(&self) -> &Arc<dyn SentimentModel> {
        &self.model
    }
}

#[async_trait]
impl Classifier for ContextualClassifier {
    async fn classify(&self, text: &str) -> Result<SentimentLabel> {
        let output = self.model.predict(text).await?;
        let label = normalize_label(&output.label);

        tracing::debug!(
            classifier = %self.name,
            raw_label = %output.label,
            score = output.score,
            %label,
            latency_us = output.latency_us,
            "Contextual classification"
        );

        Ok(label)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Build the contextual classifier described by `config`
pub async fn load_contextual_classifier(config: &ContextualConfig) -> Result<ContextualClassifier> {
    let model: Arc<dyn SentimentModel> = match config.backend {
        ContextualBackend::Lexicon => {
            tracing::info!("Using lexicon sentiment model for contextual classification");
            Arc::new(LexiconSentimentModel::new()?)
        }
        ContextualBackend::Distilbert => load_distilbert(config).await?,
    };

    Ok(ContextualClassifier::new(model))
}

#[cfg(feature = "ml-models")]
async fn load_distilbert(config: &ContextualConfig) -> Result<Arc<dyn SentimentModel>> {
    let config = config.clone();
    let model = tokio::task::spawn_blocking(move || {
        crate::distilbert::DistilBertSentimentModel::load(&config)
    })
    .await
    .map_err(|e| Error::internal(format!("Model loading task failed: {e}")))??;

    Ok(Arc::new(model))
}

#[cfg(not(feature = "ml-models"))]
async fn load_distilbert(_config: &ContextualConfig) -> Result<Arc<dyn SentimentModel>> {
    Err(Error::config(
        "DistilBERT backend requires the 'ml-models' feature flag",
    ))
}
