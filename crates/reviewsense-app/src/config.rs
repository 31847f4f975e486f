//! Application configuration
//!
//! Read from a YAML file; a missing file means defaults. Command-line flags
//! take precedence over file values.
//!
//! ```yaml
//! server:
//!   address: 0.0.0.0
//!   port: 3000
//! artifacts:
//!   dir: ./artifacts
//! contextual:
//!   backend: distilbert
//!   device: cpu
//! generator:
//!   backend: http
//!   url: http://127.0.0.1:8000/v1
//!   model: distilgpt2
//! ```

use crate::cli::{Cli, Commands};
use reviewsense_pipeline::PipelineConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// Model sections (`artifacts`, `contextual`, `generator`)
    #[serde(flatten)]
    pub pipeline: PipelineConfig,
}

impl AppConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: &Path, cli: &Cli) -> anyhow::Result<Self> {
        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            Self::from_yaml(&content)?
        } else {
            tracing::debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            Self::default()
        };

        if let Some(dir) = cli.command.artifacts() {
            config.pipeline.artifacts.dir = dir.clone();
        }

        if let Commands::Serve { address, port, .. } = &cli.command {
            if let Some(address) = address {
                config.server.address = address.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
        }

        Ok(config)
    }

    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_address")]
    pub address: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: default_port(),
        }
    }
}

fn default_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}
