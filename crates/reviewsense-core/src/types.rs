//! Core types for ReviewSense

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Two-valued sentiment produced by every classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
}

impl SentimentLabel {
    /// Lowercase label text, as embedded in prompts and rendered pages
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
        }
    }

    pub fn is_positive(&self) -> bool {
        matches!(self, Self::Positive)
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentimentLabel {
    type Err = String;

    /// Strict parse of the canonical names; free-form model labels go through
    /// the contextual classifier's normalization instead.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "positive" => Ok(Self::Positive),
            "negative" => Ok(Self::Negative),
            other => Err(format!("unknown sentiment label: {other}")),
        }
    }
}

/// A review as submitted by the user.
///
/// The original text is kept verbatim; only the emptiness check trims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReviewText(String);

impl ReviewText {
    /// Returns `None` when the text is empty after trimming whitespace.
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            None
        } else {
            Some(Self(text))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ReviewText {
    type Error = String;

    fn try_from(text: String) -> std::result::Result<Self, Self::Error> {
        Self::new(text).ok_or_else(|| "review text must not be blank".to_string())
    }
}

impl From<ReviewText> for String {
    fn from(review: ReviewText) -> Self {
        review.0
    }
}

impl AsRef<str> for ReviewText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReviewText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of analyzing one review. Created per request and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceResult {
    /// The review exactly as submitted
    pub review: ReviewText,

    /// Label from the bag-of-words classifier
    pub lexical_label: SentimentLabel,

    /// Label from the contextual model
    pub contextual_label: SentimentLabel,

    /// Post-processed generated explanation (may be empty)
    pub explanation: String,
}

impl InferenceResult {
    /// Whether both classifiers agree on the sentiment
    pub fn labels_agree(&self) -> bool {
        self.lexical_label == self.contextual_label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_text_rejects_blank() {
        assert!(ReviewText::new("").is_none());
        assert!(ReviewText::new("   \n\t ").is_none());
    }

    #[test]
    fn test_review_text_keeps_original_whitespace() {
        let review = ReviewText::new("  great watch  ").unwrap();
        assert_eq!(review.as_str(), "  great watch  ");
    }

    #[test]
    fn test_label_display_and_parse() {
        assert_eq!(SentimentLabel::Positive.to_string(), "positive");
        assert_eq!(SentimentLabel::Negative.to_string(), "negative");
        assert_eq!("Positive".parse::<SentimentLabel>(), Ok(SentimentLabel::Positive));
        assert!("neutral".parse::<SentimentLabel>().is_err());
    }

    #[test]
    fn test_result_serializes_lowercase_labels() {
        let result = InferenceResult {
            review: ReviewText::new("ok").unwrap(),
            lexical_label: SentimentLabel::Positive,
            contextual_label: SentimentLabel::Negative,
            explanation: "because".to_string(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["review"], "ok");
        assert_eq!(json["lexical_label"], "positive");
        assert_eq!(json["contextual_label"], "negative");
        assert!(!result.labels_agree());
    }

    #[test]
    fn test_review_text_deserialize_rejects_blank() {
        let review: ReviewText = serde_json::from_str("\"  fine  \"").unwrap();
        assert_eq!(review.as_str(), "  fine  ");

        assert!(serde_json::from_str::<ReviewText>("\"   \"").is_err());
        assert!(serde_json::from_str::<InferenceResult>(
            r#"{"review":"","lexical_label":"positive","contextual_label":"positive","explanation":""}"#
        )
        .is_err());
    }
}
