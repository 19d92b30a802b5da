//! Configuration management for Rekap.
//!
//! # Overview
//!
//! Rekap uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `REKAP_*` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use rekap::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("rekap.toml")?;
//!
//! println!("Output root: {}", config.export.output_dir);
//! println!("Workers: {}", config.export.worker_count);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`ExportConfig`] - Output root, rows per part, worker count
//! - [`SpreadsheetConfig`] - Header style and column widths
//! - [`PostgreSQLConfig`] - Primary and optional secondary database
//! - [`SourceConfig`] - Relation names read by the exporters
//! - [`LoggingConfig`] - Local log files
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [export]
//! output_dir = "files"
//! batch_size = 150000
//! worker_count = 10
//!
//! [postgresql.primary]
//! connection_string = "${REKAP_PRIMARY_DATABASE_URL}"
//!
//! [postgresql.secondary]
//! connection_string = "${REKAP_SECONDARY_DATABASE_URL}"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_config_str};
pub use schema::{
    ApplicationConfig, DatabaseConnectionConfig, ExportConfig, LoggingConfig, PostgreSQLConfig,
    RekapConfig, SourceConfig, SpreadsheetConfig,
};
pub use secret::{
    redact_connection_string, secret_string, secret_string_opt, SecretString, SecretValue,
};
