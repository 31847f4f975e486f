//! Lexical (bag-of-words) sentiment classifier
//!
//! A fitted [`TfidfVectorizer`] and [`LogisticRegression`] pair. The pair is
//! produced once by the training step, written as two opaque JSON blobs, and
//! loaded once at startup. After loading it is never mutated, so a single
//! `Arc<LexicalArtifacts>` is shared by every request.

mod logistic;
mod tfidf;

pub use logistic::LogisticRegression;
pub use tfidf::{TfidfState, TfidfVectorizer, DEFAULT_MAX_FEATURES};

use crate::classifier::Classifier;
use async_trait::async_trait;
use reviewsense_core::{Error, Result, SentimentLabel};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// File name of the serialized vectorizer inside the artifacts directory
pub const VECTORIZER_FILE: &str = "tfidf.json";

/// File name of the serialized classifier inside the artifacts directory
pub const CLASSIFIER_FILE: &str = "logreg.json";

/// Fitted vectorizer and classifier
pub struct LexicalArtifacts {
    pub vectorizer: TfidfVectorizer,
    pub model: LogisticRegression,
}

impl LexicalArtifacts {
    /// Fit both stages on a labelled corpus
    pub fn fit<S: AsRef<str>>(texts: &[S], labels: &[SentimentLabel]) -> Result<Self> {
        let mut vectorizer = TfidfVectorizer::new()?;
        let features = vectorizer.fit_transform(texts)?;

        let mut model = LogisticRegression::new();
        model.fit(&features, labels)?;

        Ok(Self { vectorizer, model })
    }

    pub fn predict(&self, text: &str) -> Result<SentimentLabel> {
        let features = self.vectorizer.transform(text)?;
        self.model.predict(&features)
    }

    /// Write both blobs into `dir`, creating it if needed
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let vectorizer_path = dir.join(VECTORIZER_FILE);
        std::fs::write(
            &vectorizer_path,
            serde_json::to_vec(self.vectorizer.state())?,
        )?;

        let classifier_path = dir.join(CLASSIFIER_FILE);
        std::fs::write(&classifier_path, serde_json::to_vec(&self.model)?)?;

        tracing::info!(
            "Saved lexical artifacts to {} and {}",
            vectorizer_path.display(),
            classifier_path.display()
        );
        Ok(())
    }

    /// Read both blobs from `dir`
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();

        let vectorizer_path = dir.join(VECTORIZER_FILE);
        let state = std::fs::read(&vectorizer_path).map_err(|e| {
            Error::artifact(format!(
                "Failed to read {}: {e} (run `reviewsense train` first)",
                vectorizer_path.display()
            ))
        })?;
        let vectorizer = TfidfVectorizer::from_state(serde_json::from_slice(&state)?)?;

        let classifier_path = dir.join(CLASSIFIER_FILE);
        let model = std::fs::read(&classifier_path).map_err(|e| {
            Error::artifact(format!(
                "Failed to read {}: {e} (run `reviewsense train` first)",
                classifier_path.display()
            ))
        })?;
        let model: LogisticRegression = serde_json::from_slice(&model)?;

        if model.weights.len() != vectorizer.dimension() {
            return Err(Error::artifact(format!(
                "classifier expects {} features but vectorizer produces {}",
                model.weights.len(),
                vectorizer.dimension()
            )));
        }

        tracing::info!(
            "Loaded lexical artifacts from {} ({} features)",
            dir.display(),
            vectorizer.dimension()
        );
        Ok(Self { vectorizer, model })
    }
}

/// Adapter exposing [`LexicalArtifacts`] through the [`Classifier`] trait
pub struct LexicalClassifier {
    name: String,
    artifacts: Arc<LexicalArtifacts>,
}

impl LexicalClassifier {
    pub fn new(artifacts: Arc<LexicalArtifacts>) -> Self {
        Self::with_name("tfidf-logreg", artifacts)
    }

    pub fn with_name(name: impl Into<String>, artifacts: Arc<LexicalArtifacts>) -> Self {
        Self {
            name: name.into(),
            artifacts,
        }
    }

    /// Load the artifacts from disk and wrap them
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(Arc::new(LexicalArtifacts::load(dir)?)))
    }

    pub fn artifacts(&self) -> &Arc<LexicalArtifacts> {
        &self.artifacts
    }
}

#[async_trait]
impl Classifier for LexicalClassifier {
    async fn classify(&self, text: &str) -> Result<SentimentLabel> {
        let start = Instant::now();
        let label = self.artifacts.predict(text)?;
        tracing::debug!(
            classifier = %self.name,
            %label,
            latency_us = start.elapsed().as_micros() as u64,
            "Lexical classification"
        );
        Ok(label)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
