//! Export-all command implementation
//!
//! Walks the organizational hierarchy and exports every node on the worker
//! pool. Job failures are reported but never abort the run.

use super::{load_validated, parse_dates};
use crate::cli::{exit_code, exit_code_for, KindArg};
use crate::core::export::ExportCoordinator;
use crate::domain::{ExportFilter, ExportKind, ExportScope};
use clap::Args;
use tokio::sync::watch;

/// Failures printed before the list is truncated
const MAX_LISTED_FAILURES: usize = 10;

/// Arguments for the export-all command
#[derive(Args, Debug)]
pub struct ExportAllArgs {
    /// Kind of records to export
    #[arg(short, long, value_enum)]
    pub kind: KindArg,

    /// First day of the range (YYYY/MM/DD)
    #[arg(long)]
    pub from: String,

    /// Last day of the range, inclusive (YYYY/MM/DD)
    #[arg(long)]
    pub to: String,

    /// Read from the secondary database
    #[arg(long)]
    pub secondary: bool,

    /// Override the worker count
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Override the output directory
    #[arg(short, long)]
    pub output_dir: Option<String>,
}

impl ExportAllArgs {
    /// Execute the export-all command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting export-all command");

        let Some(mut config) = load_validated(config_path) else {
            return Ok(exit_code::CONFIGURATION);
        };

        if let Some(workers) = self.workers {
            tracing::info!(workers, "Overriding worker count from CLI");
            config.export.worker_count = workers;
        }
        if let Some(dir) = &self.output_dir {
            tracing::info!(output_dir = %dir, "Overriding output directory from CLI");
            config.export.output_dir = dir.clone();
        }
        if let Err(e) = config.validate() {
            eprintln!("❌ Configuration validation failed: {e}");
            return Ok(exit_code::CONFIGURATION);
        }

        let Some(dates) = parse_dates(&self.from, &self.to) else {
            return Ok(exit_code::CONFIGURATION);
        };
        let base = ExportFilter::new(ExportScope::National, dates).with_secondary(self.secondary);
        let kind = ExportKind::from(self.kind);

        let coordinator = match ExportCoordinator::from_config(&config, shutdown_signal) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create export coordinator");
                eprintln!("Failed to initialize export: {e}");
                return Ok(exit_code::CONNECTION);
            }
        };

        println!(
            "🚀 Exporting {} for every unit with {} workers",
            kind, config.export.worker_count
        );
        println!();

        let report = match coordinator.export_all(kind, &base).await {
            Ok(r) => r,
            Err(e) => {
                crate::log_error_with_context!(&e, "Bulk export failed");
                eprintln!("❌ Bulk export failed: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        println!("📊 Export Summary:");
        println!("  Total Jobs: {}", report.total_jobs);
        println!("  Succeeded: {}", report.succeeded);
        println!("  Failed: {}", report.failed.len());
        println!("  Skipped: {}", report.skipped);
        println!("  Rows: {}", report.rows);
        println!("  Duration: {:.2}s", report.duration.as_secs_f64());
        println!("  Success Rate: {:.2}%", report.success_rate());
        println!();

        if !report.failed.is_empty() {
            println!("⚠️  Failed jobs:");
            for failure in report.failed.iter().take(MAX_LISTED_FAILURES) {
                println!(
                    "  - {} (worker {}): {}",
                    failure.filename, failure.worker_id, failure.error
                );
            }
            if report.failed.len() > MAX_LISTED_FAILURES {
                println!(
                    "  ... and {} more failures",
                    report.failed.len() - MAX_LISTED_FAILURES
                );
            }
            println!();
        }

        let code = if report.interrupted {
            println!("⚠️  Export interrupted. {} job(s) not started.", report.skipped);
            tracing::info!("Export interrupted by user signal");
            exit_code::INTERRUPTED
        } else if report.is_successful() {
            println!("✅ Export completed successfully!");
            exit_code::SUCCESS
        } else {
            println!("⚠️  Export completed with failures");
            exit_code::PARTIAL_FAILURE
        };

        Ok(code)
    }
}
