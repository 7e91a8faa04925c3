//! Quill CLI - Enrich social-media posts with derived metadata.

use clap::Parser;
use quill_cli::commands;
use quill_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr at `info`, or whatever `RUST_LOG` says; `--verbose` forces
/// `debug`.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn run(cli: Cli) -> quill_cli::Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    let formatter = Formatter::new(!cli.no_color);
    let api_key = cli.api_key.as_deref();

    match cli.command {
        Command::Process(args) => {
            commands::execute_process(args, &config, api_key, &formatter)?;
        }
        Command::Probe(args) => {
            let provider = commands::build_provider(&config.provider, api_key)?;
            commands::execute_probe(args, &provider, &formatter)?;
        }
        Command::Fallback(args) => {
            commands::execute_fallback(args, &config.extractor)?;
        }
    }

    Ok(())
}
