//! Configuration for the contextual sentiment model

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which underlying model backs the contextual classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextualBackend {
    /// DistilBERT sequence classifier run with Candle
    #[default]
    Distilbert,
    /// Offline keyword lexicon, no model download
    Lexicon,
}

impl std::str::FromStr for ContextualBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "distilbert" => Ok(Self::Distilbert),
            "lexicon" => Ok(Self::Lexicon),
            other => Err(format!(
                "unknown contextual backend '{other}' (expected distilbert or lexicon)"
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextualConfig {
    #[serde(default)]
    pub backend: ContextualBackend,

    /// Hugging Face repository to download from
    #[serde(default = "default_repo")]
    pub repo: String,

    #[serde(default = "default_revision")]
    pub revision: String,

    /// Local model directory; takes precedence over `repo`
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Inference device: cpu, cuda, metal
    #[serde(default = "default_device")]
    pub device: String,

    /// Longer inputs are truncated to this many tokens
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

impl Default for ContextualConfig {
    fn default() -> Self {
        Self {
            backend: ContextualBackend::default(),
            repo: default_repo(),
            revision: default_revision(),
            path: None,
            device: default_device(),
            max_length: default_max_length(),
        }
    }
}

fn default_repo() -> String {
    "distilbert-base-uncased-finetuned-sst-2-english".to_string()
}

fn default_revision() -> String {
    "main".to_string()
}

fn default_device() -> String {
    "cpu".to_string()
}

fn default_max_length() -> usize {
    512
}
