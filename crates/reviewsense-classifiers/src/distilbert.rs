//! DistilBERT sentiment model loaded with Candle
//!
//! Loads a `DistilBertForSequenceClassification` checkpoint (by default the
//! SST-2 fine-tune) from a local directory or the Hugging Face Hub. Inputs
//! longer than `max_length` tokens are truncated by the tokenizer, so long
//! reviews never fail. Inference runs on the blocking pool.

use crate::classifier::{ModelOutput, SentimentModel};
use crate::config::ContextualConfig;
use async_trait::async_trait;
use candle_core::{DType, Device, IndexOp, Tensor, D};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::distilbert::{Config as DistilBertConfig, DistilBertModel};
use reviewsense_core::{Error, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokenizers::models::wordpiece::WordPiece;
use tokenizers::normalizers::BertNormalizer;
use tokenizers::pre_tokenizers::bert::BertPreTokenizer;
use tokenizers::processors::bert::BertProcessing;
use tokenizers::{Model, Tokenizer, TruncationParams};

pub struct DistilBertSentimentModel {
    name: String,
    inner: Arc<Inner>,
}

struct Inner {
    tokenizer: Tokenizer,
    model: DistilBertModel,
    pre_classifier: Option<Linear>,
    classifier: Linear,
    device: Device,
    labels: Vec<String>,
}

impl DistilBertSentimentModel {
    /// Resolve, download if needed, and load the model. Blocking.
    pub fn load(config: &ContextualConfig) -> Result<Self> {
        let model_path = resolve_model_path(config)?;
        tracing::info!("Loading DistilBERT sentiment model from {}", model_path.display());

        let tokenizer = load_tokenizer(&model_path, config.max_length)?;

        let config_str = std::fs::read_to_string(model_path.join("config.json"))
            .map_err(|e| Error::classifier(format!("Failed to read config: {e}")))?;
        let config_json: serde_json::Value = serde_json::from_str(&config_str)
            .map_err(|e| Error::classifier(format!("Failed to parse config JSON: {e}")))?;

        let hidden_size = config_json
            .get("dim")
            .or_else(|| config_json.get("hidden_size"))
            .and_then(|v| v.as_u64())
            .unwrap_or(768) as usize;
        let labels = labels_from_config(&config_json);

        let distilbert_config: DistilBertConfig = serde_json::from_str(&config_str)
            .map_err(|e| Error::classifier(format!("Failed to parse config: {e}")))?;

        let device = get_device(&config.device)?;
        let vb = load_var_builder(&model_path, &device)?;

        let model = DistilBertModel::load(vb.pp("distilbert"), &distilbert_config)
            .map_err(|e| Error::classifier(format!("Failed to load DistilBERT model: {e}")))?;

        let pre_classifier =
            candle_nn::linear(hidden_size, hidden_size, vb.pp("pre_classifier")).ok();
        let classifier = candle_nn::linear(hidden_size, labels.len(), vb.pp("classifier"))
            .map_err(|e| Error::classifier(format!("Failed to load classification head: {e}")))?;

        tracing::info!(
            "Loaded DistilBERT classifier with labels {:?} (max_length={})",
            labels,
            config.max_length
        );

        Ok(Self {
            name: model_name(config),
            inner: Arc::new(Inner {
                tokenizer,
                model,
                pre_classifier,
                classifier,
                device,
                labels,
            }),
        })
    }
}

#[async_trait]
impl SentimentModel for DistilBertSentimentModel {
    async fn predict(&self, text: &str) -> Result<ModelOutput> {
        let inner = Arc::clone(&self.inner);
        let text = text.to_string();

        tokio::task::spawn_blocking(move || inner.predict(&text))
            .await
            .map_err(|e| Error::internal(format!("Inference task failed: {e}")))?
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Inner {
    fn predict(&self, text: &str) -> Result<ModelOutput> {
        let start = Instant::now();

        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| Error::classifier(format!("Tokenization failed: {e}")))?;

        let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&x| x as i64).collect();
        let input_ids = Tensor::new(input_ids.as_slice(), &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(|e| Error::classifier(format!("Failed to create input tensor: {e}")))?;

        // DistilBERT masks positions flagged with 1
        let mask: Vec<u8> = encoding
            .get_attention_mask()
            .iter()
            .map(|&x| u8::from(x == 0))
            .collect();
        let mask = Tensor::new(mask.as_slice(), &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(|e| Error::classifier(format!("Failed to create attention mask: {e}")))?;

        let hidden_states = self
            .model
            .forward(&input_ids, &mask)
            .map_err(|e| Error::classifier(format!("Model forward pass failed: {e}")))?;

        let cls_embedding = hidden_states
            .i((0, 0, ..))
            .and_then(|t| t.unsqueeze(0))
            .map_err(|e| Error::classifier(format!("Failed to get CLS token: {e}")))?;

        let pooled = match &self.pre_classifier {
            Some(pre_classifier) => pre_classifier
                .forward(&cls_embedding)
                .and_then(|t| t.relu())
                .map_err(|e| Error::classifier(format!("Pre-classifier failed: {e}")))?,
            None => cls_embedding,
        };

        let logits = self
            .classifier
            .forward(&pooled)
            .map_err(|e| Error::classifier(format!("Classification head failed: {e}")))?;

        let probs: Vec<f32> = candle_nn::ops::softmax(&logits, D::Minus1)
            .and_then(|t| t.squeeze(0))
            .and_then(|t| t.to_vec1())
            .map_err(|e| Error::classifier(format!("Softmax failed: {e}")))?;

        let (best, score) = probs
            .iter()
            .copied()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .ok_or_else(|| Error::classifier("Model produced no logits"))?;

        let label = self
            .labels
            .get(best)
            .cloned()
            .unwrap_or_else(|| format!("LABEL_{best}"));

        Ok(ModelOutput {
            label,
            score,
            latency_us: start.elapsed().as_micros() as u64,
        })
    }
}

fn model_name(config: &ContextualConfig) -> String {
    match &config.path {
        Some(path) => path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "distilbert".to_string()),
        None => config.repo.clone(),
    }
}

/// `tokenizer.json` when present, otherwise a BERT WordPiece tokenizer built
/// from `vocab.txt`. Either way inputs are truncated to `max_length` tokens.
fn load_tokenizer(model_path: &Path, max_length: usize) -> Result<Tokenizer> {
    let mut tokenizer = build_tokenizer(model_path)?;
    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length,
            ..Default::default()
        }))
        .map_err(|e| Error::classifier(format!("Failed to configure truncation: {e}")))?;
    Ok(tokenizer)
}

fn build_tokenizer(model_path: &Path) -> Result<Tokenizer> {
    let tokenizer_json_path = model_path.join("tokenizer.json");
    if tokenizer_json_path.exists() {
        tracing::debug!("Loading tokenizer from tokenizer.json");
        return Tokenizer::from_file(&tokenizer_json_path)
            .map_err(|e| Error::classifier(format!("Failed to load tokenizer.json: {e}")));
    }

    let vocab_path = model_path.join("vocab.txt");
    if !vocab_path.exists() {
        return Err(Error::classifier(format!(
            "No tokenizer found in {} (tried tokenizer.json, vocab.txt)",
            model_path.display()
        )));
    }

    tracing::debug!("Building tokenizer from vocab.txt");
    let wordpiece = WordPiece::from_file(vocab_path.to_string_lossy().as_ref())
        .unk_token("[UNK]".to_string())
        .build()
        .map_err(|e| Error::classifier(format!("Failed to build WordPiece model: {e}")))?;

    let sep = ("[SEP]".to_string(), wordpiece.token_to_id("[SEP]").unwrap_or(102));
    let cls = ("[CLS]".to_string(), wordpiece.token_to_id("[CLS]").unwrap_or(101));

    let mut tokenizer = Tokenizer::new(wordpiece);
    tokenizer.with_normalizer(Some(BertNormalizer::default()));
    tokenizer.with_pre_tokenizer(Some(BertPreTokenizer));
    tokenizer.with_post_processor(Some(BertProcessing::new(sep, cls)));

    Ok(tokenizer)
}

/// Ordered labels from `id2label`, falling back to SST-2 names
fn labels_from_config(config_json: &serde_json::Value) -> Vec<String> {
    let Some(id2label) = config_json.get("id2label").and_then(|v| v.as_object()) else {
        return vec!["NEGATIVE".to_string(), "POSITIVE".to_string()];
    };

    let ordered: BTreeMap<usize, String> = id2label
        .iter()
        .filter_map(|(id, label)| Some((id.parse().ok()?, label.as_str()?.to_string())))
        .collect();

    if ordered.is_empty() {
        vec!["NEGATIVE".to_string(), "POSITIVE".to_string()]
    } else {
        ordered.into_values().collect()
    }
}

fn resolve_model_path(config: &ContextualConfig) -> Result<PathBuf> {
    if let Some(path) = &config.path {
        if !path.exists() {
            return Err(Error::classifier(format!(
                "Model path does not exist: {}",
                path.display()
            )));
        }
        return Ok(path.clone());
    }

    download_from_huggingface(&config.repo, &config.revision)
}

fn download_from_huggingface(repo: &str, revision: &str) -> Result<PathBuf> {
    tracing::info!("Fetching model from HuggingFace: {} @ {}", repo, revision);

    let api = hf_hub::api::sync::Api::new().map_err(|e| {
        Error::classifier(format!("Failed to initialize HuggingFace API: {e}"))
    })?;
    let repo_obj = api.repo(hf_hub::Repo::with_revision(
        repo.to_string(),
        hf_hub::RepoType::Model,
        revision.to_string(),
    ));

    for file in ["model.safetensors", "config.json"] {
        tracing::debug!("Downloading {}", file);
        repo_obj
            .get(file)
            .map_err(|e| Error::classifier(format!("Failed to download {file}: {e}")))?;
    }

    // Older checkpoints ship only vocab.txt
    let mut found_tokenizer = false;
    for file in [
        "tokenizer.json",
        "vocab.txt",
        "tokenizer_config.json",
        "special_tokens_map.json",
    ] {
        match repo_obj.get(file) {
            Ok(_) => {
                tracing::debug!("Found tokenizer file: {}", file);
                found_tokenizer |= matches!(file, "tokenizer.json" | "vocab.txt");
            }
            Err(_) => tracing::debug!("File not found: {}", file),
        }
    }
    if !found_tokenizer {
        return Err(Error::classifier(
            "No tokenizer found (tried tokenizer.json, vocab.txt)",
        ));
    }

    let config_path = repo_obj
        .get("config.json")
        .map_err(|e| Error::classifier(format!("Failed to locate model cache: {e}")))?;
    let model_dir = config_path
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| Error::classifier("Invalid cache path"))?;
    tracing::info!("Model available at: {}", model_dir.display());
    Ok(model_dir)
}

fn get_device(device: &str) -> Result<Device> {
    match device.to_lowercase().as_str() {
        "cuda" | "cuda:0" => Device::new_cuda(0)
            .map_err(|e| Error::classifier(format!("Failed to initialize CUDA: {e}"))),
        "mps" | "metal" => Device::new_metal(0)
            .map_err(|e| Error::classifier(format!("Failed to initialize Metal: {e}"))),
        _ => Ok(Device::Cpu),
    }
}

fn load_var_builder(model_path: &Path, device: &Device) -> Result<VarBuilder<'static>> {
    let weights_path = model_path.join("model.safetensors");
    if !weights_path.exists() {
        return Err(Error::classifier(format!(
            "model.safetensors not found in {}",
            model_path.display()
        )));
    }

    // SAFETY: the weights file is mapped read-only and not modified while loaded.
    let vb = unsafe {
        VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device)
            .map_err(|e| Error::classifier(format!("Failed to load weights: {e}")))?
    };

    Ok(vb)
}
