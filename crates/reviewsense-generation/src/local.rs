//! In-process generation with a GPT-2 family model on Candle
//!
//! Weights and tokenizer come from a local directory or the Hugging Face
//! Hub (`distilgpt2` by default). Sampling is seeded, so the same prompt
//! yields the same continuation. The prompt is echoed back in front of the
//! continuation, matching what the explanation extractor expects.

use crate::config::LocalModelConfig;
use crate::generator::{GenerationParams, TextGenerator};
use crate::gpt2::{Gpt2Config, Gpt2Model};
use async_trait::async_trait;
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::generation::{LogitsProcessor, Sampling};
use reviewsense_core::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokenizers::Tokenizer;

pub struct LocalGenerator {
    name: String,
    inner: Arc<Inner>,
}

struct Inner {
    model: Gpt2Model,
    tokenizer: Tokenizer,
    params: GenerationParams,
    sampling: Sampling,
    seed: u64,
}

impl LocalGenerator {
    /// Resolve, download if needed, and load the model. Blocking.
    pub fn load(config: &LocalModelConfig, params: GenerationParams, seed: u64) -> Result<Self> {
        let model_path = resolve_model_path(config)?;
        tracing::info!("Loading generation model from {}", model_path.display());

        let tokenizer = Tokenizer::from_file(model_path.join("tokenizer.json"))
            .map_err(|e| Error::generation(format!("Failed to load tokenizer.json: {e}")))?;

        let config_str = std::fs::read_to_string(model_path.join("config.json"))
            .map_err(|e| Error::generation(format!("Failed to read config: {e}")))?;
        let model_config: Gpt2Config = serde_json::from_str(&config_str)
            .map_err(|e| Error::generation(format!("Failed to parse config: {e}")))?;

        let device = get_device(&config.device)?;
        let vb = load_var_builder(&model_path, &device)?;
        let model = Gpt2Model::load(&model_config, vb)
            .map_err(|e| Error::generation(format!("Failed to load GPT-2 weights: {e}")))?;

        tracing::info!(
            "Loaded {} layer generator (max_new_tokens={}, seed={})",
            model_config.n_layer,
            params.max_new_tokens,
            seed
        );

        Ok(Self {
            name: format!("local:{}", model_name(config)),
            inner: Arc::new(Inner {
                model,
                tokenizer,
                params,
                sampling: sampling_strategy(config.temperature, config.top_k),
                seed,
            }),
        })
    }
}

#[async_trait]
impl TextGenerator for LocalGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let inner = Arc::clone(&self.inner);
        let prompt = prompt.to_string();

        tokio::task::spawn_blocking(move || inner.generate(&prompt))
            .await
            .map_err(|e| Error::internal(format!("Generation task failed: {e}")))?
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Inner {
    fn generate(&self, prompt: &str) -> Result<String> {
        let start = Instant::now();

        let encoding = self
            .tokenizer
            .encode(prompt, false)
            .map_err(|e| Error::generation(format!("Tokenization failed: {e}")))?;
        let mut tokens = encoding.get_ids().to_vec();
        if tokens.is_empty() {
            return Ok(prompt.to_string());
        }

        // Fresh processor per call keeps output independent of request order
        let mut processor = LogitsProcessor::from_sampling(self.seed, self.sampling.clone());
        let window = self.model.config().n_positions;
        let eos = self.model.config().eos_token_id;
        let mut generated = Vec::with_capacity(self.params.max_new_tokens);

        for _ in 0..self.params.max_new_tokens {
            let context = &tokens[tokens.len().saturating_sub(window)..];
            let input = Tensor::new(context, self.model.device())
                .and_then(|t| t.unsqueeze(0))
                .map_err(|e| Error::generation(format!("Failed to create input tensor: {e}")))?;

            let logits = self
                .model
                .next_token_logits(&input)
                .map_err(|e| Error::generation(format!("Model forward pass failed: {e}")))?;
            let next = processor
                .sample(&logits)
                .map_err(|e| Error::generation(format!("Sampling failed: {e}")))?;

            if next == eos {
                break;
            }
            tokens.push(next);
            generated.push(next);
        }

        let continuation = self
            .tokenizer
            .decode(&generated, true)
            .map_err(|e| Error::generation(format!("Decoding failed: {e}")))?;

        tracing::debug!(
            "Generated {} tokens in {:?}",
            generated.len(),
            start.elapsed()
        );

        Ok(format!("{prompt}{continuation}"))
    }
}

/// Temperature 0 means greedy decoding
fn sampling_strategy(temperature: f64, top_k: Option<usize>) -> Sampling {
    if temperature <= 0.0 {
        return Sampling::ArgMax;
    }
    match top_k {
        Some(k) => Sampling::TopK { k, temperature },
        None => Sampling::All { temperature },
    }
}

fn model_name(config: &LocalModelConfig) -> String {
    match &config.path {
        Some(path) => path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "gpt2".to_string()),
        None => config.repo.clone(),
    }
}

fn resolve_model_path(config: &LocalModelConfig) -> Result<PathBuf> {
    if let Some(path) = &config.path {
        if !path.exists() {
            return Err(Error::generation(format!(
                "Model path does not exist: {}",
                path.display()
            )));
        }
        return Ok(path.clone());
    }

    download_from_huggingface(&config.repo, &config.revision)
}

fn download_from_huggingface(repo: &str, revision: &str) -> Result<PathBuf> {
    tracing::info!("Fetching generation model from HuggingFace: {} @ {}", repo, revision);

    let api = hf_hub::api::sync::Api::new().map_err(|e| {
        Error::generation(format!("Failed to initialize HuggingFace API: {e}"))
    })?;
    let repo_obj = api.repo(hf_hub::Repo::with_revision(
        repo.to_string(),
        hf_hub::RepoType::Model,
        revision.to_string(),
    ));

    let mut model_dir = None;
    for file in ["config.json", "tokenizer.json", "model.safetensors"] {
        tracing::debug!("Downloading {}", file);
        let path = repo_obj
            .get(file)
            .map_err(|e| Error::generation(format!("Failed to download {file}: {e}")))?;
        model_dir = path.parent().map(Path::to_path_buf);
    }

    model_dir.ok_or_else(|| Error::generation("Invalid cache path"))
}

fn get_device(device: &str) -> Result<Device> {
    match device.to_lowercase().as_str() {
        "cuda" | "cuda:0" => Device::new_cuda(0)
            .map_err(|e| Error::generation(format!("Failed to initialize CUDA: {e}"))),
        "mps" | "metal" => Device::new_metal(0)
            .map_err(|e| Error::generation(format!("Failed to initialize Metal: {e}"))),
        _ => Ok(Device::Cpu),
    }
}

fn load_var_builder(model_path: &Path, device: &Device) -> Result<VarBuilder<'static>> {
    let weights_path = model_path.join("model.safetensors");
    if !weights_path.exists() {
        return Err(Error::generation(format!(
            "model.safetensors not found in {}",
            model_path.display()
        )));
    }

    // SAFETY: the weights file is mapped read-only and not modified while loaded.
    let vb = unsafe {
        VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device)
            .map_err(|e| Error::generation(format!("Failed to load weights: {e}")))?
    };

    Ok(vb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sampling_strategy() {
        assert!(matches!(sampling_strategy(0.0, Some(50)), Sampling::ArgMax));
        assert!(matches!(
            sampling_strategy(0.8, Some(50)),
            Sampling::TopK { k: 50, .. }
        ));
        assert!(matches!(sampling_strategy(1.0, None), Sampling::All { .. }));
    }

    #[test]
    fn test_missing_local_path() {
        let config = LocalModelConfig {
            path: Some(PathBuf::from("/definitely/not/a/model")),
            ..Default::default()
        };
        let result = LocalGenerator::load(&config, GenerationParams::default(), 0);
        assert!(matches!(result, Err(Error::Generation(_))));
    }

    #[test]
    fn test_missing_weights() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_var_builder(dir.path(), &Device::Cpu),
            Err(Error::Generation(_))
        ));
    }

    #[test]
    fn test_model_name() {
        assert_eq!(model_name(&LocalModelConfig::default()), "distilgpt2");

        let config = LocalModelConfig {
            path: Some(PathBuf::from("/models/gpt2-small")),
            ..Default::default()
        };
        assert_eq!(model_name(&config), "gpt2-small");
    }
}
