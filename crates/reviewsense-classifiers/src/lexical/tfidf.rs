//! TF-IDF bag-of-words vectorizer
//!
//! Lowercases input, extracts tokens of two or more word characters, and
//! weights term counts by smoothed inverse document frequency
//! (`ln((1 + n) / (1 + df)) + 1`). Rows are L2-normalized.

use regex::Regex;
use reviewsense_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

const TOKEN_PATTERN: &str = r"\b\w\w+\b";

/// Default vocabulary cap
pub const DEFAULT_MAX_FEATURES: usize = 1000;

/// Serializable fitted state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TfidfState {
    /// Term -> column index (columns are in lexicographic term order)
    pub vocabulary: BTreeMap<String, usize>,

    /// Inverse document frequency per column
    pub idf: Vec<f64>,

    pub max_features: usize,
}

pub struct TfidfVectorizer {
    state: TfidfState,
    token_re: Regex,
}

impl TfidfVectorizer {
    pub fn new() -> Result<Self> {
        Self::with_max_features(DEFAULT_MAX_FEATURES)
    }

    pub fn with_max_features(max_features: usize) -> Result<Self> {
        Self::from_state(TfidfState {
            max_features,
            ..Default::default()
        })
    }

    /// Rebuild a vectorizer from previously fitted state
    pub fn from_state(state: TfidfState) -> Result<Self> {
        if state.idf.len() != state.vocabulary.len() {
            return Err(Error::artifact(format!(
                "vectorizer has {} idf weights for {} terms",
                state.idf.len(),
                state.vocabulary.len()
            )));
        }

        let token_re = Regex::new(TOKEN_PATTERN)
            .map_err(|e| Error::classifier(format!("Failed to build token pattern: {e}")))?;

        Ok(Self { state, token_re })
    }

    pub fn state(&self) -> &TfidfState {
        &self.state
    }

    /// Number of feature columns
    pub fn dimension(&self) -> usize {
        self.state.vocabulary.len()
    }

    pub fn is_fitted(&self) -> bool {
        !self.state.vocabulary.is_empty()
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        self.token_re
            .find_iter(&lowered)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Learn vocabulary and idf weights from the corpus
    pub fn fit<S: AsRef<str>>(&mut self, documents: &[S]) -> Result<()> {
        if documents.is_empty() {
            return Err(Error::classifier("cannot fit vectorizer on an empty corpus"));
        }

        let mut term_counts: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let tokens = self.tokenize(doc.as_ref());
            let mut seen: Vec<&String> = Vec::new();
            for token in &tokens {
                *term_counts.entry(token.clone()).or_default() += 1;
                if !seen.contains(&token) {
                    seen.push(token);
                    *doc_freq.entry(token.clone()).or_default() += 1;
                }
            }
        }

        if term_counts.is_empty() {
            return Err(Error::classifier(
                "empty vocabulary; documents contain no tokens",
            ));
        }

        // Keep the most frequent terms; ties broken alphabetically
        let mut ranked: Vec<(String, usize)> = term_counts.into_iter().collect();
        ranked.sort_by(|(ta, ca), (tb, cb)| cb.cmp(ca).then_with(|| ta.cmp(tb)));
        ranked.truncate(self.state.max_features.max(1));

        let mut kept: Vec<String> = ranked.into_iter().map(|(term, _)| term).collect();
        kept.sort();

        let n = documents.len() as f64;
        let idf = kept
            .iter()
            .map(|term| {
                let df = doc_freq.get(term).copied().unwrap_or(0) as f64;
                ((1.0 + n) / (1.0 + df)).ln() + 1.0
            })
            .collect();

        self.state.vocabulary = kept
            .into_iter()
            .enumerate()
            .map(|(idx, term)| (term, idx))
            .collect();
        self.state.idf = idf;

        tracing::debug!(
            terms = self.state.vocabulary.len(),
            documents = documents.len(),
            "Fitted TF-IDF vocabulary"
        );

        Ok(())
    }

    /// Map text onto the fixed-size feature space
    pub fn transform(&self, text: &str) -> Result<Vec<f64>> {
        if !self.is_fitted() {
            return Err(Error::artifact("vectorizer is not fitted"));
        }

        let mut row = vec![0.0; self.dimension()];
        for token in self.tokenize(text) {
            if let Some(&col) = self.state.vocabulary.get(&token) {
                row[col] += 1.0;
            }
        }

        for (value, idf) in row.iter_mut().zip(&self.state.idf) {
            *value *= idf;
        }

        let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in &mut row {
                *value /= norm;
            }
        }

        Ok(row)
    }

    pub fn fit_transform<S: AsRef<str>>(&mut self, documents: &[S]) -> Result<Vec<Vec<f64>>> {
        self.fit(documents)?;
        documents
            .iter()
            .map(|doc| self.transform(doc.as_ref()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_lowercases_and_drops_single_chars() {
        let vectorizer = TfidfVectorizer::new().unwrap();
        assert_eq!(
            vectorizer.tokenize("A Great watch, I LOVE it!"),
            vec!["great", "watch", "love", "it"]
        );
    }

    #[test]
    fn test_fit_builds_sorted_vocabulary() {
        let mut vectorizer = TfidfVectorizer::new().unwrap();
        vectorizer
            .fit(&["bright screen", "slow screen charging"])
            .unwrap();

        let terms: Vec<&String> = vectorizer.state().vocabulary.keys().collect();
        assert_eq!(terms, vec!["bright", "charging", "screen", "slow"]);
        assert_eq!(vectorizer.state().vocabulary["screen"], 2);

        // "screen" appears in every document so it gets the minimum idf
        let idf = &vectorizer.state().idf;
        assert!((idf[2] - 1.0).abs() < 1e-12);
        assert!(idf[0] > idf[2]);
    }

    #[test]
    fn test_max_features_keeps_most_frequent() {
        let mut vectorizer = TfidfVectorizer::with_max_features(2).unwrap();
        vectorizer
            .fit(&["watch watch strap", "watch band band", "screen"])
            .unwrap();
        let terms: Vec<&String> = vectorizer.state().vocabulary.keys().collect();
        assert_eq!(terms, vec!["band", "watch"]);
    }

    #[test]
    fn test_transform_is_l2_normalized() {
        let mut vectorizer = TfidfVectorizer::new().unwrap();
        vectorizer
            .fit(&["battery life is great", "battery drains fast"])
            .unwrap();

        let row = vectorizer.transform("great battery").unwrap();
        let norm: f64 = row.iter().map(|v| v * v).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-9);

        let unknown = vectorizer.transform("zzz qqq").unwrap();
        assert!(unknown.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_transform_requires_fit() {
        let vectorizer = TfidfVectorizer::new().unwrap();
        assert!(vectorizer.transform("anything").is_err());
    }

    #[test]
    fn test_from_state_rejects_mismatched_idf() {
        let state = TfidfState {
            vocabulary: [("watch".to_string(), 0)].into_iter().collect(),
            idf: vec![],
            max_features: 10,
        };
        assert!(TfidfVectorizer::from_state(state).is_err());
    }
}
