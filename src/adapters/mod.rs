//! External system integrations for Rekap.
//!
//! - [`traits`] - The [`RowSource`] and [`HierarchyProvider`] seams used by
//!   the export pipeline
//! - [`postgresql`] - PostgreSQL implementation of both
//!
//! # Example
//!
//! ```rust,no_run
//! use rekap::adapters::postgresql::{PostgresClient, PostgresRowSource};
//! use rekap::adapters::RowSource;
//! use rekap::config::load_config;
//! use rekap::domain::{DateRange, ExportFilter, ExportKind, ExportScope};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("rekap.toml")?;
//! let primary = Arc::new(PostgresClient::new(&config.postgresql.primary)?);
//! let source = PostgresRowSource::new(primary, None, config.source.clone());
//!
//! let dates = DateRange::parse("2025/05/01", "2025/05/27")?;
//! let filter = ExportFilter::new(ExportScope::Area("52000".to_string()), dates);
//! let rows = source.fetch_rows(ExportKind::Transactions, &filter).await?;
//! println!("{} rows", rows.len());
//! # Ok(())
//! # }
//! ```

pub mod postgresql;
pub mod traits;

pub use traits::{HierarchyProvider, RowSource};
