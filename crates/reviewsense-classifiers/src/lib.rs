//! ReviewSense Classifiers
//!
//! The two sentiment classifiers used to analyze a review:
//! - Lexical: TF-IDF bag-of-words features and a logistic-regression decision
//!   function, fitted offline on a small labelled dataset
//! - Contextual: a pretrained sentiment model (DistilBERT via Candle, or an
//!   offline keyword lexicon) whose free-form label is normalized to the
//!   two-valued [`SentimentLabel`](reviewsense_core::SentimentLabel)
//!
//! Both expose the same [`Classifier`] trait so the orchestrator treats them as
//! interchangeable black boxes.

pub mod classifier;
pub mod config;
pub mod contextual;
pub mod dataset;
#[cfg(feature = "ml-models")]
pub mod distilbert;
pub mod lexical;
pub mod sentiment;

pub use classifier::{Classifier, ModelOutput, SentimentModel};
pub use config::{ContextualBackend, ContextualConfig};
pub use contextual::{load_contextual_classifier, normalize_label, ContextualClassifier};
pub use dataset::{accuracy, smartwatch_reviews, train_test_split, LabeledReview};
pub use lexical::{LexicalArtifacts, LexicalClassifier, LogisticRegression, TfidfVectorizer};
pub use sentiment::LexiconSentimentModel;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifier::{Classifier, ModelOutput, SentimentModel};
    pub use crate::contextual::{normalize_label, ContextualClassifier};
    pub use crate::lexical::{LexicalArtifacts, LexicalClassifier};
    pub use crate::sentiment::LexiconSentimentModel;
}
