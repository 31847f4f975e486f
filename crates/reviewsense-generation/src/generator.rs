//! Generator trait and generation limits

use async_trait::async_trait;
use reviewsense_core::Result;
use serde::{Deserialize, Serialize};

/// Upper bound on generated tokens per call
pub const MAX_NEW_TOKENS: usize = 60;

/// Candidate sequences requested per call
pub const NUM_RETURN_SEQUENCES: usize = 1;

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Continue `prompt`, returning the raw generated text
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Get the generator name
    fn name(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub max_new_tokens: usize,
    pub num_return_sequences: usize,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_new_tokens: MAX_NEW_TOKENS,
            num_return_sequences: NUM_RETURN_SEQUENCES,
        }
    }
}
