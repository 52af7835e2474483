//! News article summarizer
//!
//! Reads a news-please style article JSON file, asks an OpenAI-compatible
//! chat completion API for a short objective summary plus a structured list
//! of events, and prints the model's reply to stdout.

mod cli;
mod conversion;
mod core;
mod models;
mod runner;

use crate::cli::Cli;
use crate::core::config::Config;
use crate::core::logging::init_logging;
use clap::Parser;
use tracing::info;

#[tokio::main]
async fn main() {
    // Populate the environment from .env when present
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load(cli.config.as_deref())
        .and_then(|config| config.with_overrides(cli.overrides()))
    {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.log_level);

    info!(
        article = %cli.article.display(),
        model = %config.model,
        dry_run = cli.dry_run,
        "Summarizing article"
    );

    let mut stdout = std::io::stdout().lock();
    if let Err(e) = runner::run(&cli.article, cli.dry_run, &config, &mut stdout).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
