//! Mock adapters for orchestrator tests
//!
//! Each mock counts its calls and appends its name to a shared log so tests
//! can check both how often and in what order adapters ran.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use reviewsense_classifiers::Classifier;
use reviewsense_core::{Error, Result, SentimentLabel};
use reviewsense_generation::TextGenerator;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub struct MockClassifier {
    name: String,
    label: SentimentLabel,
    fail: bool,
    log: CallLog,
    inputs: Mutex<Vec<String>>,
    call_count: AtomicU32,
}

impl MockClassifier {
    pub fn new(name: &str, label: SentimentLabel, log: CallLog) -> Self {
        Self {
            name: name.to_string(),
            label,
            fail: false,
            log,
            inputs: Mutex::new(Vec::new()),
            call_count: AtomicU32::new(0),
        }
    }

    /// Make every call return a classifier error
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn inputs(&self) -> Vec<String> {
        self.inputs.lock().clone()
    }
}

#[async_trait]
impl Classifier for MockClassifier {
    async fn classify(&self, text: &str) -> Result<SentimentLabel> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        self.log.lock().push(self.name.clone());
        self.inputs.lock().push(text.to_string());

        if self.fail {
            return Err(Error::classifier(format!("{} unavailable", self.name)));
        }
        Ok(self.label)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

pub struct MockGenerator {
    continuation: String,
    echo_prompt: bool,
    latency: Option<Duration>,
    log: CallLog,
    prompts: Mutex<Vec<String>>,
    call_count: AtomicU32,
}

impl MockGenerator {
    /// Returns the prompt followed by `continuation`
    pub fn new(continuation: &str, log: CallLog) -> Self {
        Self {
            continuation: continuation.to_string(),
            echo_prompt: true,
            latency: None,
            log,
            prompts: Mutex::new(Vec::new()),
            call_count: AtomicU32::new(0),
        }
    }

    /// Return only the continuation, without the prompt
    pub fn without_echo(mut self) -> Self {
        self.echo_prompt = false;
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        self.log.lock().push("generator".to_string());
        self.prompts.lock().push(prompt.to_string());

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        Ok(if self.echo_prompt {
            format!("{prompt}{}", self.continuation)
        } else {
            self.continuation.clone()
        })
    }

    fn name(&self) -> &str {
        "mock-generator"
    }
}

/// Generator that always fails
pub struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Err(Error::generation("backend offline"))
    }

    fn name(&self) -> &str {
        "failing-generator"
    }
}
