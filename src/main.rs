// file: src/main.rs
// description: commandline application entry point and menu bootstrap
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use rag_bench::utils::logging::{format_error, init_logger};
use rag_bench::{Config, ModeController, OllamaClient, OllamaEmbeddingClient};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "rag_bench")]
#[command(version = "0.1.0")]
#[command(
    about = "Ask questions about local PDFs with Ollama models and benchmark them",
    long_about = None
)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "RAG_BENCH_CONFIG",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logger(cli.color, cli.verbose);

    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::load(None).unwrap_or_else(|e| {
            warn!("Falling back to built-in defaults: {}", e);
            Config::default_config()
        })
    };

    if !config.documents.pdf_dir.is_dir() {
        eprintln!(
            "{}",
            format_error(&format!(
                "PDF folder '{}' does not exist",
                config.documents.pdf_dir.display()
            ))
        );
        std::process::exit(1);
    }

    let generator =
        OllamaClient::new(&config.ollama).context("Failed to create Ollama client")?;
    let embedder = OllamaEmbeddingClient::new(&config.ollama)
        .context("Failed to create Ollama embedding client")?;
    info!(
        "Using Ollama at {} with embedding model {}",
        generator.base_url(),
        config.ollama.embedding_model
    );

    let stdin = std::io::stdin();
    let mut controller = ModeController::new(
        config,
        Arc::new(embedder),
        Arc::new(generator),
        stdin.lock(),
        std::io::stdout(),
    );

    controller.run().await.context("Session aborted")?;

    Ok(())
}
