//! ReviewSense application layer
//!
//! Everything the `reviewsense` binary needs around the inference pipeline:
//! command-line parsing, YAML configuration, the axum web demo, and the
//! training/evaluation command.

pub mod cli;
pub mod config;
pub mod error;
pub mod server;
pub mod state;
pub mod telemetry;
pub mod train;

pub use cli::{Cli, Commands};
pub use config::AppConfig;
pub use error::AppError;
pub use server::{build_app, run_server};
pub use state::AppState;
