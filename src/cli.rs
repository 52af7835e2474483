//! Command line interface

use crate::core::config::Overrides;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "article-summarizer",
    version,
    about = "Summarize a news article JSON file and extract its events with an LLM",
    after_help = "Environment variables:\n  API_KEY    Bearer token for the chat completion API (required unless --dry-run)\n  RUST_LOG   Log filter, overrides the configured level\n\nA .env file in the working directory is loaded first if present."
)]
pub struct Cli {
    /// Article JSON file (news-please format)
    pub article: PathBuf,

    /// TOML settings file (defaults to ./summarizer.toml when present)
    #[arg(short, long, env = "SUMMARIZER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Model identifier
    #[arg(short, long)]
    pub model: Option<String>,

    /// Sampling temperature (0.0 to 2.0)
    #[arg(short, long)]
    pub temperature: Option<f32>,

    /// Maximum tokens to generate
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Print the request body instead of sending it
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// Settings given on the command line
    pub fn overrides(&self) -> Overrides {
        Overrides {
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            log_level: self.log_level.clone(),
        }
    }
}
