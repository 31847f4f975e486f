//! Orchestrator behaviour with mock adapters

mod common;

use common::{call_log, FailingGenerator, MockClassifier, MockGenerator};
use reviewsense_core::{Error, SentimentLabel};
use reviewsense_pipeline::Orchestrator;
use std::sync::Arc;
use std::time::Duration;

struct Harness {
    lexical: Arc<MockClassifier>,
    contextual: Arc<MockClassifier>,
    generator: Arc<MockGenerator>,
    log: common::CallLog,
    orchestrator: Orchestrator,
}

fn harness(lexical: SentimentLabel, contextual: SentimentLabel, continuation: &str) -> Harness {
    let log = call_log();
    let lexical = Arc::new(MockClassifier::new("lexical", lexical, log.clone()));
    let contextual = Arc::new(MockClassifier::new("contextual", contextual, log.clone()));
    let generator = Arc::new(MockGenerator::new(continuation, log.clone()));
    let orchestrator = Orchestrator::new(lexical.clone(), contextual.clone(), generator.clone());

    Harness {
        lexical,
        contextual,
        generator,
        log,
        orchestrator,
    }
}

#[tokio::test]
async fn test_empty_input_calls_nothing() {
    let h = harness(SentimentLabel::Positive, SentimentLabel::Positive, " fine.");

    for input in ["", "   ", "\n\t  "] {
        assert!(h.orchestrator.analyze(input).await.unwrap().is_none());
    }

    assert_eq!(h.lexical.call_count(), 0);
    assert_eq!(h.contextual.call_count(), 0);
    assert_eq!(h.generator.call_count(), 0);
}

#[tokio::test]
async fn test_each_adapter_called_once_generator_last() {
    let h = harness(
        SentimentLabel::Negative,
        SentimentLabel::Positive,
        " The screen is praised.",
    );
    let review = "Bright screen but the strap broke.";

    let result = h.orchestrator.analyze(review).await.unwrap().unwrap();

    assert_eq!(h.lexical.call_count(), 1);
    assert_eq!(h.contextual.call_count(), 1);
    assert_eq!(h.generator.call_count(), 1);

    let log = h.log.lock().clone();
    assert_eq!(log.len(), 3);
    assert_eq!(log[2], "generator");

    // Disagreeing labels are both reported as-is
    assert_eq!(result.lexical_label, SentimentLabel::Negative);
    assert_eq!(result.contextual_label, SentimentLabel::Positive);
    assert!(!result.labels_agree());
    assert_eq!(result.review.as_str(), review);
}

#[tokio::test]
async fn test_classifiers_receive_original_text() {
    let h = harness(SentimentLabel::Positive, SentimentLabel::Positive, " ok");
    let review = "  Great battery!  ";

    h.orchestrator.analyze(review).await.unwrap();

    assert_eq!(h.lexical.inputs(), vec![review.to_string()]);
    assert_eq!(h.contextual.inputs(), vec![review.to_string()]);
}

#[tokio::test]
async fn test_prompt_uses_contextual_label_and_review() {
    let h = harness(SentimentLabel::Positive, SentimentLabel::Negative, " It lags.");
    let review = "The app keeps crashing.";

    h.orchestrator.analyze(review).await.unwrap();

    let prompts = h.generator.prompts();
    assert_eq!(
        prompts,
        vec![
            "In one short sentence, explain why the following smartwatch review is negative: \"The app keeps crashing.\""
                .to_string()
        ]
    );
    assert!(prompts[0].contains("negative"));
    assert!(prompts[0].contains(review));
}

#[tokio::test]
async fn test_explanation_is_text_after_last_colon() {
    let h = harness(
        SentimentLabel::Positive,
        SentimentLabel::Positive,
        " Because the battery lasts long. ",
    );

    let result = h
        .orchestrator
        .analyze("Battery lasts forever")
        .await
        .unwrap()
        .unwrap();

    // The echoed prompt ends with `: "<review>"`, so the quoted review stays
    assert_eq!(
        result.explanation,
        "\"Battery lasts forever\" Because the battery lasts long."
    );
}

#[tokio::test]
async fn test_colon_in_generation_wins() {
    let log = call_log();
    let orchestrator = Orchestrator::new(
        Arc::new(MockClassifier::new("l", SentimentLabel::Positive, log.clone())),
        Arc::new(MockClassifier::new("c", SentimentLabel::Positive, log.clone())),
        Arc::new(MockGenerator::new("Explain why: it's great", log).without_echo()),
    );

    let result = orchestrator.analyze("nice watch").await.unwrap().unwrap();
    assert_eq!(result.explanation, "it's great");
}

#[tokio::test]
async fn test_no_colon_keeps_whole_generation() {
    let log = call_log();
    let orchestrator = Orchestrator::new(
        Arc::new(MockClassifier::new("l", SentimentLabel::Positive, log.clone())),
        Arc::new(MockClassifier::new("c", SentimentLabel::Positive, log.clone())),
        Arc::new(MockGenerator::new("  this is fine  ", log).without_echo()),
    );

    let result = orchestrator.analyze("nice watch").await.unwrap().unwrap();
    assert_eq!(result.explanation, "this is fine");
}

#[tokio::test]
async fn test_repeated_calls_give_same_result() {
    let h = harness(SentimentLabel::Positive, SentimentLabel::Positive, " Good.");

    let first = h.orchestrator.analyze("Love the design").await.unwrap();
    let second = h.orchestrator.analyze("Love the design").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(h.generator.call_count(), 2);
}

#[tokio::test]
async fn test_classifier_error_skips_generation() {
    let log = call_log();
    let generator = Arc::new(MockGenerator::new(" unused", log.clone()));
    let orchestrator = Orchestrator::new(
        Arc::new(MockClassifier::new("l", SentimentLabel::Positive, log.clone())),
        Arc::new(MockClassifier::new("c", SentimentLabel::Positive, log).failing()),
        generator.clone(),
    );

    let err = orchestrator.analyze("anything").await.unwrap_err();
    assert!(matches!(err, Error::Classifier(_)));
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn test_generator_error_propagates() {
    let log = call_log();
    let orchestrator = Orchestrator::new(
        Arc::new(MockClassifier::new("l", SentimentLabel::Positive, log.clone())),
        Arc::new(MockClassifier::new("c", SentimentLabel::Positive, log)),
        Arc::new(FailingGenerator),
    );

    let err = orchestrator.analyze("anything").await.unwrap_err();
    assert!(matches!(err, Error::Generation(_)));
}

#[tokio::test(start_paused = true)]
async fn test_slow_generator_times_out() {
    let log = call_log();
    let orchestrator = Orchestrator::new(
        Arc::new(MockClassifier::new("l", SentimentLabel::Positive, log.clone())),
        Arc::new(MockClassifier::new("c", SentimentLabel::Positive, log.clone())),
        Arc::new(MockGenerator::new(" late", log).with_latency(Duration::from_secs(120))),
    )
    .with_generation_timeout(Some(Duration::from_secs(30)));

    let err = orchestrator.analyze("anything").await.unwrap_err();
    assert!(matches!(err, Error::Timeout));
}

#[tokio::test(start_paused = true)]
async fn test_generator_within_timeout_succeeds() {
    let log = call_log();
    let orchestrator = Orchestrator::new(
        Arc::new(MockClassifier::new("l", SentimentLabel::Positive, log.clone())),
        Arc::new(MockClassifier::new("c", SentimentLabel::Positive, log.clone())),
        Arc::new(
            MockGenerator::new(" on time", log)
                .without_echo()
                .with_latency(Duration::from_secs(1)),
        ),
    )
    .with_generation_timeout(Some(Duration::from_secs(30)));

    let result = orchestrator.analyze("anything").await.unwrap().unwrap();
    assert_eq!(result.explanation, "on time");
}

#[tokio::test]
async fn test_concurrent_requests_share_orchestrator() {
    let h = harness(SentimentLabel::Positive, SentimentLabel::Positive, " Fine.");

    let tasks: Vec<_> = (0..8)
        .map(|i| {
            let orchestrator = h.orchestrator.clone();
            tokio::spawn(async move { orchestrator.analyze(&format!("review {i}")).await })
        })
        .collect();

    for task in tasks {
        let result = task.await.unwrap().unwrap().unwrap();
        assert!(result.review.as_str().starts_with("review "));
    }
    assert_eq!(h.generator.call_count(), 8);
}
