use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "reviewsense")]
#[command(
    author,
    version,
    about = "Smartwatch review sentiment analysis with generated explanations"
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, default_value = "reviewsense.yaml")]
    pub config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the web demo
    Serve {
        /// Listen address
        #[arg(short, long)]
        address: Option<String>,

        /// Listen port
        #[arg(short, long)]
        port: Option<u16>,

        /// Directory holding the trained lexical model
        #[arg(long, env = "REVIEWSENSE_ARTIFACTS")]
        artifacts: Option<PathBuf>,
    },

    /// Train the lexical model on the built-in dataset and compare classifiers
    Train {
        /// Directory to write the trained lexical model to
        #[arg(long, env = "REVIEWSENSE_ARTIFACTS")]
        artifacts: Option<PathBuf>,

        /// Shuffle seed for the train/test split
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Fraction of the dataset held out for evaluation
        #[arg(long, default_value = "0.25", value_parser = parse_fraction)]
        test_size: f64,
    },

    /// Analyze a single review and print the result
    Analyze {
        /// Review text
        review: String,

        /// Directory holding the trained lexical model
        #[arg(long, env = "REVIEWSENSE_ARTIFACTS")]
        artifacts: Option<PathBuf>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    pub fn artifacts(&self) -> Option<&PathBuf> {
        match self {
            Commands::Serve { artifacts, .. }
            | Commands::Train { artifacts, .. }
            | Commands::Analyze { artifacts, .. } => artifacts.as_ref(),
        }
    }
}

fn parse_fraction(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if value > 0.0 && value < 1.0 {
        Ok(value)
    } else {
        Err(format!("{value} is not between 0 and 1"))
    }
}
