//! Per-request inference orchestration

use crate::config::PipelineConfig;
use crate::postprocess::extract_explanation;
use crate::prompt::build_prompt;
use reviewsense_classifiers::{load_contextual_classifier, Classifier, LexicalClassifier};
use reviewsense_core::{Error, InferenceResult, Result, ReviewText};
use reviewsense_generation::{build_generator, TextGenerator};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Runs both classifiers and the explanation generator for one review.
///
/// Holds the loaded models behind `Arc`s, so it is cheap to clone and safe to
/// share across concurrent requests. No state is carried between calls.
#[derive(Clone)]
pub struct Orchestrator {
    lexical: Arc<dyn Classifier>,
    contextual: Arc<dyn Classifier>,
    generator: Arc<dyn TextGenerator>,
    generation_timeout: Option<Duration>,
}

impl Orchestrator {
    pub fn new(
        lexical: Arc<dyn Classifier>,
        contextual: Arc<dyn Classifier>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            lexical,
            contextual,
            generator,
            generation_timeout: None,
        }
    }

    /// Bound the generation call; `None` waits indefinitely
    pub fn with_generation_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.generation_timeout = timeout;
        self
    }

    /// Load every model named in `config`.
    ///
    /// Fails if the lexical artifacts are missing, so a misconfigured
    /// deployment is caught at startup rather than on the first request.
    pub async fn from_config(config: &PipelineConfig) -> Result<Self> {
        let lexical = LexicalClassifier::load(&config.artifacts.dir)?;
        info!(
            "Loaded lexical classifier from {}",
            config.artifacts.dir.display()
        );

        let contextual = load_contextual_classifier(&config.contextual).await?;
        info!("Loaded contextual classifier {}", contextual.name());

        let generator = build_generator(&config.generator)?;

        Ok(Self::new(Arc::new(lexical), Arc::new(contextual), generator)
            .with_generation_timeout(config.generator.timeout()))
    }

    pub fn lexical(&self) -> &Arc<dyn Classifier> {
        &self.lexical
    }

    pub fn contextual(&self) -> &Arc<dyn Classifier> {
        &self.contextual
    }

    pub fn generator(&self) -> &Arc<dyn TextGenerator> {
        &self.generator
    }

    /// Analyze one review.
    ///
    /// Returns `Ok(None)` for empty or whitespace-only input without calling
    /// any model. Otherwise both classifiers see the original text, the
    /// contextual label drives the prompt, and the explanation is whatever
    /// follows the last colon of the generated text.
    pub async fn analyze(&self, review: &str) -> Result<Option<InferenceResult>> {
        let Some(review) = ReviewText::new(review) else {
            metrics::counter!("reviewsense_empty_requests_total").increment(1);
            debug!("Skipping empty review");
            return Ok(None);
        };

        metrics::counter!("reviewsense_requests_total").increment(1);
        let start = Instant::now();

        let result = self.run(review).await;

        match &result {
            Ok(inference) => {
                metrics::histogram!("reviewsense_pipeline_latency_us", "phase" => "total")
                    .record(start.elapsed().as_micros() as f64);
                info!(
                    lexical = %inference.lexical_label,
                    contextual = %inference.contextual_label,
                    latency_ms = start.elapsed().as_millis() as u64,
                    "Analyzed review"
                );
            }
            Err(e) => {
                metrics::counter!("reviewsense_errors_total", "type" => error_kind(e))
                    .increment(1);
                warn!("Review analysis failed: {}", e);
            }
        }

        result.map(Some)
    }

    async fn run(&self, review: ReviewText) -> Result<InferenceResult> {
        let classify_start = Instant::now();
        let (lexical_label, contextual_label) = tokio::try_join!(
            self.lexical.classify(review.as_str()),
            self.contextual.classify(review.as_str()),
        )?;
        metrics::histogram!("reviewsense_pipeline_latency_us", "phase" => "classify")
            .record(classify_start.elapsed().as_micros() as f64);
        debug!(
            "{} -> {}, {} -> {}",
            self.lexical.name(),
            lexical_label,
            self.contextual.name(),
            contextual_label
        );

        let prompt = build_prompt(contextual_label, review.as_str());

        let generate_start = Instant::now();
        let raw = self.generate(&prompt).await?;
        metrics::histogram!("reviewsense_pipeline_latency_us", "phase" => "generate")
            .record(generate_start.elapsed().as_micros() as f64);

        Ok(InferenceResult {
            review,
            lexical_label,
            contextual_label,
            explanation: extract_explanation(&raw),
        })
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let generation = self.generator.generate(prompt);
        match self.generation_timeout {
            Some(limit) => tokio::time::timeout(limit, generation)
                .await
                .map_err(|_| {
                    warn!(
                        "Generator {} exceeded {:?}",
                        self.generator.name(),
                        limit
                    );
                    Error::Timeout
                })?,
            None => generation.await,
        }
    }
}

fn error_kind(error: &Error) -> &'static str {
    match error {
        Error::Classifier(_) => "classifier",
        Error::Generation(_) => "generation",
        Error::Artifact(_) => "artifact",
        Error::Config(_) => "config",
        Error::Io(_) => "io",
        Error::Serialization(_) => "serialization",
        Error::Timeout => "timeout",
        Error::Internal(_) => "internal",
    }
}
