//! Training and evaluation over the built-in dataset

use reviewsense_classifiers::{
    accuracy, load_contextual_classifier, smartwatch_reviews, train_test_split, Classifier,
    ContextualConfig, LabeledReview, LexicalArtifacts, LexicalClassifier,
};
use reviewsense_core::{Result, SentimentLabel};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

/// Outcome of one training run
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub train_size: usize,
    pub test_size: usize,
    /// Reviews the saved model was fitted on
    pub saved_model_size: usize,
    pub lexical_accuracy: f64,
    pub contextual_accuracy: f64,
}

impl std::fmt::Display for TrainingReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Final Comparison ===")?;
        writeln!(
            f,
            "Samples:     {} train / {} test",
            self.train_size, self.test_size
        )?;
        writeln!(f, "Classical:   {:.2}%", self.lexical_accuracy * 100.0)?;
        write!(f, "Transformer: {:.2}%", self.contextual_accuracy * 100.0)
    }
}

/// Score both classifiers on a held-out split, then refit the lexical model
/// on every review and write it to `artifacts_dir`.
///
/// The split only measures accuracy. Ten reviews leave too little signal to
/// discard a quarter of them from the served model.
pub async fn run_training(
    artifacts_dir: &Path,
    contextual: &ContextualConfig,
    test_size: f64,
    seed: u64,
) -> Result<TrainingReport> {
    let data = smartwatch_reviews();
    let (train, test) = train_test_split(&data, test_size, seed);
    tracing::info!(
        "Split {} reviews into {} train / {} test (seed={})",
        data.len(),
        train.len(),
        test.len(),
        seed
    );

    let lexical = LexicalClassifier::new(Arc::new(fit(&train)?));
    let lexical_accuracy = evaluate(&lexical, &test).await?;
    tracing::info!("Classical model accuracy: {}", lexical_accuracy);

    fit(&data)?.save(artifacts_dir)?;
    tracing::info!(
        "Saved classical model fitted on all {} reviews to {}",
        data.len(),
        artifacts_dir.display()
    );

    let contextual = load_contextual_classifier(contextual).await?;
    let contextual_accuracy = evaluate(&contextual, &test).await?;
    tracing::info!("Contextual model accuracy: {}", contextual_accuracy);

    Ok(TrainingReport {
        train_size: train.len(),
        test_size: test.len(),
        saved_model_size: data.len(),
        lexical_accuracy,
        contextual_accuracy,
    })
}

fn fit(samples: &[LabeledReview]) -> Result<LexicalArtifacts> {
    let texts: Vec<&str> = samples.iter().map(|r| r.text).collect();
    let labels: Vec<SentimentLabel> = samples.iter().map(|r| r.label).collect();
    LexicalArtifacts::fit(&texts, &labels)
}

async fn evaluate(classifier: &dyn Classifier, samples: &[LabeledReview]) -> Result<f64> {
    let mut predicted = Vec::with_capacity(samples.len());
    for sample in samples {
        predicted.push(classifier.classify(sample.text).await?);
    }
    let expected: Vec<SentimentLabel> = samples.iter().map(|r| r.label).collect();
    Ok(accuracy(&predicted, &expected))
}
