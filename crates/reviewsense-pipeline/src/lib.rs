//! ReviewSense Pipeline
//!
//! The per-request inference pipeline. For one review it:
//! 1. short-circuits blank input (no model is called)
//! 2. runs the lexical and contextual classifiers on the original text
//! 3. builds a fixed-template prompt from the contextual label and the review
//! 4. calls the explanation generator (optionally under a timeout)
//! 5. strips echoed prompt text from the generation
//!
//! Models are loaded once by [`Orchestrator::from_config`] and shared
//! read-only by every request.

pub mod config;
pub mod orchestrator;
pub mod postprocess;
pub mod prompt;

pub use config::PipelineConfig;
pub use orchestrator::Orchestrator;
pub use postprocess::extract_explanation;
pub use prompt::build_prompt;
