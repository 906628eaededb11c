//! Hook dispatch command.

use clap::Args;

use mapsync_core::error::AppError;
use mapsync_plugin::DispatchOptions;

use crate::engine::Engine;
use crate::output::{self, OutputFormat};

/// Arguments for the dispatch command
#[derive(Debug, Args)]
pub struct DispatchArgs {
    /// Hook name, e.g. before-operation
    pub hook: String,

    /// JSON payload
    #[arg(short, long)]
    pub payload: Option<String>,

    /// Give every handler the original payload and discard results
    #[arg(long)]
    pub parallel: bool,

    /// Abort on the first failing handler
    #[arg(long)]
    pub stop_on_error: bool,
}

/// Execute the dispatch command
pub async fn execute(
    args: &DispatchArgs,
    engine: &Engine,
    format: OutputFormat,
) -> Result<(), AppError> {
    let payload = super::parse_payload(args.payload.as_deref())?;
    let options = if args.parallel {
        DispatchOptions::parallel()
    } else {
        DispatchOptions::chain()
    }
    .stop_on_error(args.stop_on_error);

    let report = engine
        .manager
        .dispatch_report(args.hook.as_str(), payload, options)
        .await?;

    match format {
        OutputFormat::Json => output::print_json(&report),
        OutputFormat::Table => {
            output::print_success(&format!("Dispatched '{}'", report.hook));
            output::print_kv("Invoked", &report.invoked.join(", "));
            output::print_kv("Skipped", &report.skipped.join(", "));
            for failure in &report.failures {
                output::print_warning(&format!("{}: {}", failure.plugin, failure.error));
            }
            output::print_heading("Result:", format);
            output::print_json(&report.value);
        }
    }

    Ok(())
}
