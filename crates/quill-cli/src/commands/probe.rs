//! Probe command implementation.

use crate::cli::ProbeArgs;
use crate::error::Result;
use crate::output::Formatter;
use quill_domain::CompletionProvider;
use quill_llm::LlmError;
use tracing::info;

/// Execute the probe command: one raw completion, no parsing or retry.
pub fn execute_probe<P>(args: ProbeArgs, provider: &P, formatter: &Formatter) -> Result<()>
where
    P: CompletionProvider<Error = LlmError>,
{
    info!("Probing {}", provider.model_name());
    let reply = provider.complete(&args.prompt)?;

    println!("{}", formatter.info(&format!("Reply from {}:", provider.model_name())));
    println!("{}", reply);
    Ok(())
}
