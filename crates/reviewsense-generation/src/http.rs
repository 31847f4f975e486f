//! OpenAI-compatible completions client
//!
//! Talks to any server exposing `POST {base_url}/completions` (vLLM,
//! llama.cpp, text-generation-inference in OpenAI mode) hosting a small
//! causal model such as `distilgpt2`. Single attempt, no retry.

use crate::generator::{GenerationParams, TextGenerator};
use async_trait::async_trait;
use reviewsense_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Instant;

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: usize,
    n: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    text: String,
}

pub struct HttpGenerator {
    name: String,
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    params: GenerationParams,
    seed: Option<u64>,
    echo_prompt: bool,
}

impl HttpGenerator {
    pub fn new(base_url: impl AsRef<str>, model: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::generation(format!("Failed to build HTTP client: {e}")))?;

        let model = model.into();
        Ok(Self {
            name: format!("http:{model}"),
            client,
            endpoint: format!("{}/completions", base_url.as_ref().trim_end_matches('/')),
            model,
            api_key: None,
            params: GenerationParams::default(),
            seed: None,
            echo_prompt: true,
        })
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    /// Ask the server for reproducible sampling
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Whether the returned text starts with the prompt (default true)
    pub fn with_echo(mut self, echo_prompt: bool) -> Self {
        self.echo_prompt = echo_prompt;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl TextGenerator for HttpGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let start = Instant::now();

        let body = CompletionRequest {
            model: &self.model,
            prompt,
            max_tokens: self.params.max_new_tokens,
            n: self.params.num_return_sequences,
            seed: self.seed,
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::generation(format!("Request to {} failed: {e}", self.endpoint)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::generation(format!(
                "Backend returned {status}: {detail}"
            )));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::generation(format!("Malformed completion response: {e}")))?;

        let text = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.text)
            .ok_or_else(|| Error::generation("Completion response has no choices"))?;

        tracing::debug!(
            generator = %self.name,
            chars = text.len(),
            latency_ms = start.elapsed().as_millis() as u64,
            "Generated completion"
        );

        Ok(if self.echo_prompt {
            format!("{prompt}{text}")
        } else {
            text
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
