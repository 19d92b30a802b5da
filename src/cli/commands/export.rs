//! Export command implementation
//!
//! This module implements the `export` command: one scope is fetched,
//! written as spreadsheet parts and bundled into a single archive.

use super::{load_validated, parse_dates};
use crate::cli::{exit_code, exit_code_for, KindArg};
use crate::core::export::{ExportCoordinator, SUCCESS_MARKER};
use crate::domain::{ExportFilter, ExportKind, ExportScope};
use clap::Args;
use tokio::sync::watch;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Kind of records to export
    #[arg(short, long, value_enum)]
    pub kind: KindArg,

    /// Unit code; takes precedence over --area and --region
    #[arg(long)]
    pub unit: Option<String>,

    /// Area id; takes precedence over --region
    #[arg(long)]
    pub area: Option<String>,

    /// Region id
    #[arg(long)]
    pub region: Option<String>,

    /// First day of the range (YYYY/MM/DD)
    #[arg(long)]
    pub from: String,

    /// Last day of the range, inclusive (YYYY/MM/DD)
    #[arg(long)]
    pub to: String,

    /// Maximum number of rows to fetch
    #[arg(long)]
    pub limit: Option<u64>,

    /// Number of rows to skip
    #[arg(long)]
    pub offset: Option<u64>,

    /// Read from the secondary database
    #[arg(long)]
    pub secondary: bool,

    /// Override the output directory
    #[arg(short, long)]
    pub output_dir: Option<String>,
}

impl ExportArgs {
    /// Builds the filter described by the arguments
    pub fn filter(&self) -> Option<ExportFilter> {
        let dates = parse_dates(&self.from, &self.to)?;
        let scope = ExportScope::from_parts(
            self.unit.as_deref(),
            self.area.as_deref(),
            self.region.as_deref(),
        );

        let mut filter = ExportFilter::new(scope, dates).with_secondary(self.secondary);
        if self.limit.is_some() || self.offset.is_some() {
            filter = filter.with_pagination(self.limit.unwrap_or(0), self.offset.unwrap_or(0));
        }
        Some(filter)
    }

    /// Execute the export command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let Some(mut config) = load_validated(config_path) else {
            return Ok(exit_code::CONFIGURATION);
        };

        if let Some(dir) = &self.output_dir {
            tracing::info!(output_dir = %dir, "Overriding output directory from CLI");
            config.export.output_dir = dir.clone();
        }

        let Some(filter) = self.filter() else {
            return Ok(exit_code::CONFIGURATION);
        };
        let kind = ExportKind::from(self.kind);

        let coordinator = match ExportCoordinator::from_config(&config, shutdown_signal) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create export coordinator");
                eprintln!("Failed to initialize export: {e}");
                return Ok(exit_code::CONNECTION);
            }
        };

        println!("🚀 Exporting {} for {}", kind, filter.label());
        println!();

        match coordinator.export_single(kind, &filter).await {
            Ok(outcome) => {
                println!("📊 Export Summary:");
                println!("  Parts: {}", outcome.parts.len());
                println!("  Rows: {}", outcome.rows);
                println!("  Archive: {}", outcome.archive_path.display());
                println!("  Duration: {:.2}s", outcome.duration.as_secs_f64());
                println!();
                println!("✅ {SUCCESS_MARKER}");
                Ok(exit_code::SUCCESS)
            }
            Err(e) if e.is_cancelled() => {
                println!();
                println!("⚠️  Export interrupted. Files already written stay on disk.");
                Ok(exit_code::INTERRUPTED)
            }
            Err(e) => {
                crate::log_error_with_context!(&e, "Export failed");
                eprintln!("❌ Export failed: {e}");
                Ok(exit_code_for(&e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> ExportArgs {
        ExportArgs {
            kind: KindArg::Transactions,
            unit: None,
            area: Some("52000".to_string()),
            region: Some("51".to_string()),
            from: "2025/01/01".to_string(),
            to: "2025/01/31".to_string(),
            limit: None,
            offset: None,
            secondary: false,
            output_dir: None,
        }
    }

    #[test]
    fn test_filter_uses_scope_precedence() {
        let filter = args().filter().unwrap();
        assert_eq!(filter.scope, ExportScope::Area("52000".to_string()));
        assert_eq!(filter.label(), "AREA_52000_20250101_20250131");
        assert!(filter.pagination.is_none());
    }

    #[test]
    fn test_filter_with_pagination_and_secondary() {
        let mut args = args();
        args.limit = Some(100);
        args.secondary = true;

        let filter = args.filter().unwrap();
        let pagination = filter.pagination.unwrap();
        assert_eq!(pagination.limit, 100);
        assert_eq!(pagination.offset, 0);
        assert!(filter.use_secondary);
    }

    #[test]
    fn test_filter_rejects_bad_dates() {
        let mut args = args();
        args.to = "31-01-2025".to_string();
        assert!(args.filter().is_none());
    }
}
