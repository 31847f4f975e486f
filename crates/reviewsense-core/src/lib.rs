//! ReviewSense Core
//!
//! Types shared across ReviewSense components.
//!
//! This crate provides:
//! - The two-valued sentiment label every classifier normalizes into
//! - The per-request inference result handed to the presentation layer
//! - Error types and result handling

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{InferenceResult, ReviewText, SentimentLabel};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{InferenceResult, ReviewText, SentimentLabel};
}
