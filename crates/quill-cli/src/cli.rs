//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Quill - Enrich posts with line count, language and topic tags.
#[derive(Debug, Parser)]
#[command(name = "quill")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (defaults to ~/.quill/config.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// API key for the completion endpoint
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Enrich every post of a dataset and write the result
    Process(ProcessArgs),

    /// Send one prompt to the completion endpoint and print the reply
    Probe(ProbeArgs),

    /// Print heuristic metadata for a text, without calling the model
    Fallback(FallbackArgs),
}

/// Arguments for the process command.
#[derive(Debug, Parser)]
pub struct ProcessArgs {
    /// Input dataset (JSON array of posts)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output path for the enriched dataset
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Skip the model entirely; every post gets heuristic metadata
    #[arg(long)]
    pub offline: bool,

    /// Retry immediately instead of backing off
    #[arg(long)]
    pub no_backoff: bool,

    /// Number of enriched posts to preview after the run
    #[arg(long, default_value = "3")]
    pub preview: usize,
}

/// Arguments for the probe command.
#[derive(Debug, Parser)]
pub struct ProbeArgs {
    /// Prompt text
    pub prompt: String,
}

/// Arguments for the fallback command.
#[derive(Debug, Parser)]
pub struct FallbackArgs {
    /// Post text
    pub text: String,
}
