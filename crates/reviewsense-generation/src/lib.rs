//! ReviewSense Generation
//!
//! Produces the free-text explanation for a review. The orchestrator only sees
//! the [`TextGenerator`] trait; three backends are provided:
//! - `LocalGenerator`: a GPT-2 family model run in process (`ml-models`)
//! - [`HttpGenerator`]: any OpenAI-compatible `/completions` endpoint
//! - [`TemplateGenerator`]: deterministic, seeded, fully offline
//!
//! Like a text-generation pipeline, all of them return the prompt followed by the
//! continuation. Output is not guaranteed to be on-topic or free of echo.

pub mod config;
pub mod generator;
#[cfg(feature = "ml-models")]
pub mod gpt2;
pub mod http;
#[cfg(feature = "ml-models")]
pub mod local;
pub mod template;

pub use config::{build_generator, GeneratorBackend, GeneratorConfig, LocalModelConfig};
pub use generator::{GenerationParams, TextGenerator, MAX_NEW_TOKENS, NUM_RETURN_SEQUENCES};
pub use http::HttpGenerator;
#[cfg(feature = "ml-models")]
pub use local::LocalGenerator;
pub use template::TemplateGenerator;
