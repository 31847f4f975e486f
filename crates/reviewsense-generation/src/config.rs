//! Generator configuration

use crate::generator::{GenerationParams, TextGenerator, MAX_NEW_TOKENS, NUM_RETURN_SEQUENCES};
use crate::http::HttpGenerator;
use crate::template::TemplateGenerator;
use reviewsense_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorBackend {
    /// GPT-2 family model run in process
    #[default]
    Local,
    /// Offline seeded templates
    Template,
    /// OpenAI-compatible completions endpoint
    Http,
}

impl std::str::FromStr for GeneratorBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "template" => Ok(Self::Template),
            "http" => Ok(Self::Http),
            other => Err(format!(
                "unknown generator backend '{other}' (expected local, template or http)"
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default)]
    pub backend: GeneratorBackend,

    /// Base URL of the completions API, e.g. `http://127.0.0.1:8000/v1`
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_max_new_tokens")]
    pub max_new_tokens: usize,

    #[serde(default = "default_num_return_sequences")]
    pub num_return_sequences: usize,

    /// Sampling seed; fixed by default so repeated requests match
    #[serde(default)]
    pub seed: u64,

    /// Upper bound on one generation call; 0 disables the timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub local: LocalModelConfig,
}

/// Where the in-process model comes from and how it samples
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalModelConfig {
    #[serde(default = "default_model")]
    pub repo: String,

    #[serde(default = "default_revision")]
    pub revision: String,

    /// Local model directory; skips the Hub when set
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// cpu, cuda or metal
    #[serde(default = "default_device")]
    pub device: String,

    /// 0 selects greedy decoding
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_top_k")]
    pub top_k: Option<usize>,
}

impl Default for LocalModelConfig {
    fn default() -> Self {
        Self {
            repo: default_model(),
            revision: default_revision(),
            path: None,
            device: default_device(),
            temperature: default_temperature(),
            top_k: default_top_k(),
        }
    }
}

impl GeneratorConfig {
    pub fn params(&self) -> GenerationParams {
        GenerationParams {
            max_new_tokens: self.max_new_tokens,
            num_return_sequences: self.num_return_sequences,
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            backend: GeneratorBackend::default(),
            url: None,
            model: default_model(),
            api_key: None,
            max_new_tokens: default_max_new_tokens(),
            num_return_sequences: default_num_return_sequences(),
            seed: 0,
            timeout_secs: default_timeout_secs(),
            local: LocalModelConfig::default(),
        }
    }
}

fn default_model() -> String {
    "distilgpt2".to_string()
}

fn default_revision() -> String {
    "main".to_string()
}

fn default_device() -> String {
    "cpu".to_string()
}

fn default_temperature() -> f64 {
    1.0
}

fn default_top_k() -> Option<usize> {
    Some(50)
}

fn default_max_new_tokens() -> usize {
    MAX_NEW_TOKENS
}

fn default_num_return_sequences() -> usize {
    NUM_RETURN_SEQUENCES
}

fn default_timeout_secs() -> u64 {
    30
}

/// Build the generator described by `config`
pub fn build_generator(config: &GeneratorConfig) -> Result<Arc<dyn TextGenerator>> {
    if config.num_return_sequences != NUM_RETURN_SEQUENCES {
        tracing::warn!(
            "num_return_sequences={} requested; only the first sequence is used",
            config.num_return_sequences
        );
    }

    match config.backend {
        GeneratorBackend::Local => build_local(config),
        GeneratorBackend::Template => {
            tracing::info!("Using template explanation generator (seed={})", config.seed);
            Ok(Arc::new(
                TemplateGenerator::new(config.seed).with_params(config.params()),
            ))
        }
        GeneratorBackend::Http => {
            let url = config
                .url
                .as_deref()
                .ok_or_else(|| Error::config("generator.url is required for the http backend"))?;

            let mut generator = HttpGenerator::new(url, config.model.clone())?
                .with_params(config.params())
                .with_seed(config.seed);
            if let Some(key) = &config.api_key {
                generator = generator.with_api_key(key.clone());
            }

            tracing::info!(
                "Using HTTP explanation generator {} (model={})",
                generator.endpoint(),
                config.model
            );
            Ok(Arc::new(generator))
        }
    }
}

#[cfg(feature = "ml-models")]
fn build_local(config: &GeneratorConfig) -> Result<Arc<dyn TextGenerator>> {
    let generator =
        crate::local::LocalGenerator::load(&config.local, config.params(), config.seed)?;
    tracing::info!("Using in-process explanation generator {}", generator.name());
    Ok(Arc::new(generator))
}

#[cfg(not(feature = "ml-models"))]
fn build_local(_config: &GeneratorConfig) -> Result<Arc<dyn TextGenerator>> {
    Err(Error::config(
        "the local generator backend requires the ml-models feature",
    ))
}
