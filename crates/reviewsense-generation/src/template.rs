//! Seeded offline explanation generator
//!
//! Stands in for a hosted language model in demos and tests. It reads the
//! sentiment and the quoted review out of the prompt, picks a phrasing with an
//! RNG seeded from the configured seed and the prompt, and returns the prompt
//! followed by the sentence. The same seed and prompt always give the same
//! text.

use crate::generator::{GenerationParams, TextGenerator};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use reviewsense_core::Result;

/// Product aspects the generator knows how to talk about
const ASPECTS: &[&str] = &[
    "battery",
    "screen",
    "display",
    "strap",
    "design",
    "charging",
    "notifications",
    "app",
    "tracking",
    "heart rate",
    "performance",
    "touch",
    "connection",
];

pub struct TemplateGenerator {
    name: String,
    seed: u64,
    params: GenerationParams,
    positive: Vec<&'static str>,
    negative: Vec<&'static str>,
}

impl TemplateGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            name: "template".to_string(),
            seed,
            params: GenerationParams::default(),
            positive: vec![
                "The reviewer is clearly pleased with the {aspect} and describes it in glowing terms.",
                "It praises the {aspect}, which suggests the watch meets everyday expectations.",
                "The review highlights how well the {aspect} works, so the overall impression is good.",
                "Because the {aspect} impressed the user, the tone of the review is upbeat.",
            ],
            negative: vec![
                "The reviewer is frustrated with the {aspect} and feels let down by it.",
                "It complains about the {aspect}, which spoils the experience of using the watch.",
                "The review points out problems with the {aspect}, so the overall impression is poor.",
                "Because the {aspect} disappointed the user, the tone of the review is critical.",
            ],
        }
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    fn rng_for(&self, prompt: &str) -> StdRng {
        StdRng::seed_from_u64(self.seed ^ fnv1a(prompt.as_bytes()))
    }

    fn compose(&self, prompt: &str) -> String {
        let mut rng = self.rng_for(prompt);
        let lowered = prompt.to_lowercase();

        // Only the instruction before the quoted review carries the label
        let instruction = lowered.split('"').next().unwrap_or_default();
        let positive = instruction.contains(" is positive:");
        let templates = if positive {
            &self.positive
        } else {
            &self.negative
        };

        let review = quoted_review(&lowered).unwrap_or(lowered.as_str());
        let mentioned: Vec<&str> = ASPECTS
            .iter()
            .copied()
            .filter(|aspect| review.contains(aspect))
            .collect();
        let aspect = mentioned
            .choose(&mut rng)
            .copied()
            .unwrap_or("overall experience");

        let template = templates
            .choose(&mut rng)
            .copied()
            .unwrap_or("The review speaks about the {aspect}.");

        truncate_words(&template.replace("{aspect}", aspect), self.params.max_new_tokens)
    }
}

#[async_trait]
impl TextGenerator for TemplateGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        Ok(format!("{prompt} {}", self.compose(prompt)))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// 64-bit FNV-1a, stable across releases and platforms
fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    bytes.iter().fold(OFFSET_BASIS, |hash, &byte| {
        (hash ^ u64::from(byte)).wrapping_mul(PRIME)
    })
}

/// Text between the first and last double quote, if any
fn quoted_review(prompt: &str) -> Option<&str> {
    let start = prompt.find('"')?;
    let end = prompt.rfind('"')?;
    (end > start).then(|| &prompt[start + 1..end])
}

fn truncate_words(text: &str, max_words: usize) -> String {
    text.split_whitespace()
        .take(max_words)
        .collect::<Vec<_>>()
        .join(" ")
}
