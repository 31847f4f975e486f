use anyhow::Context;
use clap::Parser;
use reviewsense_app::cli::{Cli, Commands};
use reviewsense_app::config::AppConfig;
use reviewsense_app::server::run_server;
use reviewsense_app::state::AppState;
use reviewsense_app::telemetry::{init_logging, init_metrics};
use reviewsense_app::train::run_training;
use reviewsense_pipeline::Orchestrator;
use std::net::SocketAddr;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = AppConfig::load(&cli.config, &cli)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;

    match cli.command {
        Commands::Serve { .. } => {
            let metrics = init_metrics()?;

            tracing::info!("Loading models...");
            let orchestrator = Orchestrator::from_config(&config.pipeline).await?;
            let state = AppState::new(orchestrator).with_metrics(metrics);

            let addr: SocketAddr =
                format!("{}:{}", config.server.address, config.server.port).parse()?;

            println!();
            println!("  Smartwatch Sentiment Analyzer");
            println!("  Artifacts: {}", config.pipeline.artifacts.dir.display());
            println!("  Open http://{} in your browser", addr);
            println!();

            run_server(state, addr).await?;
        }

        Commands::Train {
            seed, test_size, ..
        } => {
            let report = run_training(
                &config.pipeline.artifacts.dir,
                &config.pipeline.contextual,
                test_size,
                seed,
            )
            .await?;

            println!("{report}");
            println!(
                "Saved lexical model to {}",
                config.pipeline.artifacts.dir.display()
            );
        }

        Commands::Analyze { review, json, .. } => {
            let orchestrator = Orchestrator::from_config(&config.pipeline).await?;

            match orchestrator.analyze(&review).await? {
                Some(result) if json => println!("{}", serde_json::to_string_pretty(&result)?),
                Some(result) => {
                    println!("Classical ML:  {}", result.lexical_label);
                    println!("Transformer:   {}", result.contextual_label);
                    if !result.explanation.is_empty() {
                        println!("Explanation:   {}", result.explanation);
                    }
                }
                None if json => println!("null"),
                None => println!("Empty review, nothing to analyze."),
            }
        }
    }

    Ok(())
}
