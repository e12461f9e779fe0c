//! Batch command handler.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use ecoroute_lib::{run_batch, BatchReport, BatchRequest, Dataset};

use crate::output::OutputFormat;

/// Arguments for the `batch` command.
#[derive(Args, Debug, Clone)]
pub struct BatchCommandArgs {
    /// Batch request file.
    #[arg(long = "input", default_value = "input.txt")]
    pub input: PathBuf,
    /// File the batch result is written to.
    #[arg(long = "output", default_value = "output.txt")]
    pub output: PathBuf,
}

/// Parse `input`, run it and write the result to `output`.
pub fn process_batch(dataset: &Dataset, input: &Path, output: &Path) -> Result<BatchReport> {
    let request = BatchRequest::from_path(input)
        .with_context(|| format!("failed to read batch request from {}", input.display()))?;
    let report = run_batch(dataset, &request).context("failed to run batch request")?;
    report
        .write_to(output)
        .with_context(|| format!("failed to write batch result to {}", output.display()))?;
    info!(
        mode = %request.mode,
        output = %output.display(),
        "batch request processed"
    );
    Ok(report)
}

/// Handle the `batch` subcommand.
pub fn handle_batch_command(
    dataset: &Dataset,
    format: OutputFormat,
    args: &BatchCommandArgs,
) -> Result<()> {
    let report = process_batch(dataset, &args.input, &args.output)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    format
        .render_batch(&mut out, &report, &args.output)
        .context("failed to write batch summary")?;
    out.flush().context("failed to flush output")
}
