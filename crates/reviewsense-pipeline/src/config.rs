//! Pipeline configuration

use reviewsense_classifiers::ContextualConfig;
use reviewsense_generation::GeneratorConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Where the trained lexical artifacts live
    #[serde(default)]
    pub artifacts: ArtifactsConfig,

    #[serde(default)]
    pub contextual: ContextualConfig,

    #[serde(default)]
    pub generator: GeneratorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactsConfig {
    #[serde(default = "default_artifacts_dir")]
    pub dir: PathBuf,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            dir: default_artifacts_dir(),
        }
    }
}

fn default_artifacts_dir() -> PathBuf {
    PathBuf::from("./artifacts")
}
