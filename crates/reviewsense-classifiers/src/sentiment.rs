//! Lightweight keyword sentiment model
//!
//! Lexicon-based scorer used when no pretrained model is loaded. It reports
//! labels in the same uppercase vocabulary as SST-2 style models so it flows
//! through the contextual classifier's normalization unchanged.

use crate::classifier::{ModelOutput, SentimentModel};
use aho_corasick::{AhoCorasick, MatchKind};
use reviewsense_core::{Error, Result};
use std::time::Instant;

pub struct LexiconSentimentModel {
    name: String,
    /// Positive keywords first, then negative ones
    matcher: AhoCorasick,
    positive_count: usize,
}

impl LexiconSentimentModel {
    pub fn new() -> Result<Self> {
        Self::with_name("sentiment-lexicon")
    }

    pub fn with_name(name: impl Into<String>) -> Result<Self> {
        let positive = vec![
            "good",
            "great",
            "excellent",
            "love",
            "amazing",
            "wonderful",
            "fantastic",
            "awesome",
            "best",
            "bright",
            "smooth",
            "reliable",
            "accurate",
            "perfect",
            "easy",
            "responsive",
        ];
        let negative = vec![
            "bad",
            "terrible",
            "awful",
            "hate",
            "horrible",
            "worst",
            "disappointed",
            "poor",
            "cheap",
            "slow",
            "laggy",
            "useless",
            "frustrating",
            "confusing",
            "uncomfortable",
            "inaccurate",
            "overheats",
            "disconnect",
        ];

        let positive_count = positive.len();

        // Leftmost-longest so "inaccurate" is not also read as "accurate"
        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::LeftmostLongest)
            .build(positive.into_iter().chain(negative))
            .map_err(|e| Error::classifier(format!("Failed to build sentiment matcher: {e}")))?;

        Ok(Self {
            name: name.into(),
            matcher,
            positive_count,
        })
    }
}

#[async_trait::async_trait]
impl SentimentModel for LexiconSentimentModel {
    async fn predict(&self, text: &str) -> Result<ModelOutput> {
        let start = Instant::now();

        let (positive_hits, negative_hits) =
            self.matcher
                .find_iter(text)
                .fold((0.0f32, 0.0f32), |(pos, neg), m| {
                    if m.pattern().as_usize() < self.positive_count {
                        (pos + 1.0, neg)
                    } else {
                        (pos, neg + 1.0)
                    }
                });
        let total = positive_hits + negative_hits;

        let score = if total == 0.0 {
            0.5
        } else {
            positive_hits / total
        };
        let (label, confidence) = if score >= 0.5 {
            ("POSITIVE", score)
        } else {
            ("NEGATIVE", 1.0 - score)
        };

        Ok(ModelOutput {
            label: label.to_string(),
            score: confidence,
            latency_us: start.elapsed().as_micros() as u64,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
