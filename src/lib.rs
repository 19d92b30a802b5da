// Rekap - Hierarchical spreadsheet export pipeline
// Copyright (c) 2025 Rekap Contributors
// Licensed under the MIT License

//! # Rekap - hierarchical spreadsheet exports
//!
//! Rekap turns large transaction and customer result sets into compressed
//! spreadsheet archives, scoped by an organizational hierarchy of regions,
//! sub-regions, areas and units.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Fetching** scoped rows from PostgreSQL
//! - **Batching** large row sets into spreadsheet-sized parts
//! - **Writing** streamed xlsx files with a styled header
//! - **Fanning out** over the hierarchy on a bounded worker pool
//! - **Archiving** parts into a tar.gz with path-safety checks
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Export pipeline (batching, spreadsheets, jobs, worker pool, archives)
//! - [`adapters`] - Row source and hierarchy provider seams plus PostgreSQL
//! - [`domain`] - Filters, records, hierarchy and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rekap::config::load_config;
//! use rekap::core::export::ExportCoordinator;
//! use rekap::domain::{DateRange, ExportFilter, ExportKind, ExportScope};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("rekap.toml")?;
//!     let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!     let coordinator = ExportCoordinator::from_config(&config, shutdown_rx)?;
//!
//!     let dates = DateRange::parse("2025/05/01", "2025/05/27")?;
//!     let base = ExportFilter::new(ExportScope::National, dates);
//!     let report = coordinator.export_all(ExportKind::Transactions, &base).await?;
//!
//!     println!("{} of {} jobs succeeded", report.succeeded, report.total_jobs);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Library code returns [`domain::Result`] with [`domain::RekapError`]. Bulk
//! exports never fail because of a single job; failures are collected as
//! [`domain::JobError`] values in the report.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
