//! Router tests driven through `tower::ServiceExt::oneshot`

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use reviewsense_app::{build_app, AppState};
use reviewsense_classifiers::Classifier;
use reviewsense_core::{Error, Result, SentimentLabel};
use reviewsense_generation::TextGenerator;
use reviewsense_pipeline::Orchestrator;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

struct FixedClassifier {
    label: SentimentLabel,
    call_count: AtomicU32,
}

impl FixedClassifier {
    fn new(label: SentimentLabel) -> Self {
        Self {
            label,
            call_count: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl Classifier for FixedClassifier {
    async fn classify(&self, _text: &str) -> Result<SentimentLabel> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        Ok(self.label)
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

struct EchoGenerator {
    continuation: &'static str,
}

#[async_trait]
impl TextGenerator for EchoGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        Ok(format!("{prompt}{}", self.continuation))
    }

    fn name(&self) -> &str {
        "echo"
    }
}

struct BrokenGenerator;

#[async_trait]
impl TextGenerator for BrokenGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Err(Error::generation("backend offline"))
    }

    fn name(&self) -> &str {
        "broken"
    }
}

fn app_with(generator: Arc<dyn TextGenerator>) -> (Router, Arc<FixedClassifier>) {
    let lexical = Arc::new(FixedClassifier::new(SentimentLabel::Negative));
    let contextual = Arc::new(FixedClassifier::new(SentimentLabel::Positive));
    let orchestrator = Orchestrator::new(lexical.clone(), contextual, generator);
    (build_app(AppState::new(orchestrator)), lexical)
}

fn app() -> (Router, Arc<FixedClassifier>) {
    app_with(Arc::new(EchoGenerator {
        continuation: " The wearer loves it.",
    }))
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn form_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn json_request(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/analyze")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let (app, _) = app();
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("ok"));
}

#[tokio::test]
async fn test_get_renders_empty_form() {
    let (app, lexical) = app();
    let response = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let page = body_string(response).await;
    assert!(page.contains(r#"name="review""#));
    assert!(!page.contains("Model Outputs"));
    assert_eq!(lexical.call_count.load(Ordering::Relaxed), 0);
}

#[tokio::test]
async fn test_post_form_renders_results() {
    let (app, _) = app();
    let response = app
        .oneshot(form_request("review=Great+battery%21"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let page = body_string(response).await;
    assert!(page.contains(">Great battery!</textarea>"));
    assert!(page.contains(r#"<span class="neg">negative</span>"#));
    assert!(page.contains(r#"<span class="pos">positive</span>"#));
    assert!(page.contains("The wearer loves it."));
}

#[tokio::test]
async fn test_post_blank_form_skips_models() {
    let (app, lexical) = app();
    let response = app.oneshot(form_request("review=+++")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let page = body_string(response).await;
    assert!(!page.contains("Model Outputs"));
    assert_eq!(lexical.call_count.load(Ordering::Relaxed), 0);
}

#[tokio::test]
async fn test_post_form_without_field() {
    let (app, lexical) = app();
    let response = app.oneshot(form_request("")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(lexical.call_count.load(Ordering::Relaxed), 0);
}

#[tokio::test]
async fn test_api_analyze() {
    let (app, _) = app();
    let response = app
        .oneshot(json_request(serde_json::json!({ "review": "Great battery" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["review"], "Great battery");
    assert_eq!(body["lexical_label"], "negative");
    assert_eq!(body["contextual_label"], "positive");
    assert_eq!(body["explanation"], "\"Great battery\" The wearer loves it.");
}

#[tokio::test]
async fn test_api_empty_review_is_null() {
    let (app, _) = app();
    let response = app
        .oneshot(json_request(serde_json::json!({ "review": "" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "null");
}

#[tokio::test]
async fn test_api_generation_failure() {
    let (app, _) = app_with(Arc::new(BrokenGenerator));
    let response = app
        .oneshot(json_request(serde_json::json!({ "review": "Great battery" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert!(body["error"].as_str().unwrap().contains("backend offline"));
}

#[tokio::test]
async fn test_form_generation_failure_renders_error_page() {
    let (app, _) = app_with(Arc::new(BrokenGenerator));
    let response = app.oneshot(form_request("review=ok")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let page = body_string(response).await;
    assert!(page.contains("Analysis failed"));
    assert!(page.contains("backend offline"));
}

#[tokio::test]
async fn test_metrics_without_recorder() {
    let (app, _) = app();
    let response = app
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
