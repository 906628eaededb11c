//! Operation cycle command.

use clap::Args;
use serde_json::json;

use mapsync_core::error::AppError;

use crate::engine::Engine;
use crate::output::{self, OutputFormat};

/// Arguments for the cycle command
#[derive(Debug, Args)]
pub struct CycleArgs {
    /// Operation name passed to the hooks
    #[arg(short, long, default_value = "sync")]
    pub operation: String,

    /// JSON payload
    #[arg(short, long)]
    pub payload: Option<String>,

    /// Make the operation fail to exercise the error hook
    #[arg(long)]
    pub fail: bool,
}

/// Execute the cycle command
pub async fn execute(
    args: &CycleArgs,
    engine: &Engine,
    format: OutputFormat,
) -> Result<(), AppError> {
    let payload = super::parse_payload(args.payload.as_deref())?;
    let fail = args.fail;

    let result = engine
        .manager
        .run_operation(&args.operation, payload, |prepared| async move {
            if fail {
                Err(AppError::internal("operation failed on request"))
            } else {
                Ok(prepared)
            }
        })
        .await;

    let metrics = engine.performance.snapshot();
    let logs = engine.logging.logs();

    match format {
        OutputFormat::Json => {
            let outcome = match &result {
                Ok(value) => json!({ "ok": true, "output": value }),
                Err(e) => json!({ "ok": false, "error": e.to_string() }),
            };
            output::print_json(&json!({
                "operation": args.operation,
                "outcome": outcome,
                "metrics": metrics,
                "logs": logs,
            }));
        }
        OutputFormat::Table => {
            match &result {
                Ok(_) => {
                    output::print_success(&format!("Operation '{}' completed", args.operation))
                }
                Err(e) => {
                    output::print_warning(&format!("Operation '{}' failed: {}", args.operation, e))
                }
            }
            output::print_kv("Calls", &metrics.calls.to_string());
            output::print_kv("Total (ms)", &format!("{:.3}", metrics.total_ms));
            output::print_kv("Average (ms)", &format!("{:.3}", metrics.average_ms));
            output::print_heading("Log entries:", format);
            for entry in &logs {
                println!(
                    "  [{}] {:?} {}",
                    entry.timestamp.format("%H:%M:%S%.3f"),
                    entry.kind,
                    entry.message
                );
            }
        }
    }

    Ok(())
}
