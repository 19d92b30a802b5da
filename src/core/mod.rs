//! Core business logic for Rekap.
//!
//! This module contains the export pipeline.
//!
//! # Modules
//!
//! - [`export`] - Batch planning, job building, the worker pool and coordination
//! - [`spreadsheet`] - Streamed spreadsheet parts with a styled header
//! - [`archive`] - Path-checked tar/gzip archives
//!
//! # Export Workflow
//!
//! A single-scope export:
//!
//! 1. **Fetch**: Read the scoped rows from the row source
//! 2. **Batch**: Split the rows into parts of `export.batch_size` rows
//! 3. **Write**: Stream one spreadsheet per part
//! 4. **Archive**: Bundle the parts into `<output_root>/<label>.tar.gz`
//!
//! A bulk export walks the hierarchy into one job per node and runs fetch and
//! write for each job on the worker pool.
//!
//! # Example
//!
//! ```rust,no_run
//! use rekap::config::load_config;
//! use rekap::core::export::ExportCoordinator;
//! use rekap::domain::{DateRange, ExportFilter, ExportKind, ExportScope};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("rekap.toml")?;
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!
//! let coordinator = ExportCoordinator::from_config(&config, shutdown_rx)?;
//!
//! let dates = DateRange::parse("2025/05/01", "2025/05/27")?;
//! let filter = ExportFilter::new(ExportScope::Region("51".to_string()), dates);
//! let outcome = coordinator
//!     .export_single(ExportKind::Customers, &filter)
//!     .await?;
//!
//! println!("Archive: {}", outcome.archive_path.display());
//! println!("Rows: {}", outcome.rows);
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod export;
pub mod spreadsheet;
