//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Rekap using clap.

pub mod commands;

use crate::domain::RekapError;
use clap::{Parser, Subcommand, ValueEnum};

/// Process exit codes
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const PARTIAL_FAILURE: i32 = 1;
    pub const CONFIGURATION: i32 = 2;
    pub const CONNECTION: i32 = 4;
    pub const FATAL: i32 = 5;
    pub const INTERRUPTED: i32 = 130;
}

/// Maps a failed export onto its exit code
pub fn exit_code_for(error: &RekapError) -> i32 {
    match error {
        RekapError::Cancelled(_) => exit_code::INTERRUPTED,
        RekapError::Configuration(_) | RekapError::Validation(_) => exit_code::CONFIGURATION,
        RekapError::Database(_) | RekapError::SourceFetch(_) => exit_code::CONNECTION,
        _ => exit_code::FATAL,
    }
}

/// Rekap - hierarchical spreadsheet exports from PostgreSQL
#[derive(Parser, Debug)]
#[command(name = "rekap")]
#[command(version, about, long_about = None)]
#[command(author = "Rekap Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "rekap.toml", env = "REKAP_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "REKAP_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export one unit, area, region or the whole organization into an archive
    Export(commands::export::ExportArgs),

    /// Export every node of the organizational hierarchy
    ExportAll(commands::export_all::ExportAllArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

/// Record kind selectable on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindArg {
    Transactions,
    Customers,
}

impl From<KindArg> for crate::domain::ExportKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Transactions => crate::domain::ExportKind::Transactions,
            KindArg::Customers => crate::domain::ExportKind::Customers,
        }
    }
}
