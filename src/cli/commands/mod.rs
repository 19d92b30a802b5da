//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod export;
pub mod export_all;
pub mod init;
pub mod validate;

use crate::config::{load_config, RekapConfig};
use crate::domain::DateRange;

/// Loads and validates the configuration, printing the failure
pub(crate) fn load_validated(config_path: &str) -> Option<RekapConfig> {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load configuration");
            eprintln!("❌ Failed to load configuration: {e}");
            return None;
        }
    };

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Configuration validation failed");
        eprintln!("❌ Configuration validation failed: {e}");
        return None;
    }

    Some(config)
}

/// Parses the `--from`/`--to` pair, printing the failure
pub(crate) fn parse_dates(from: &str, to: &str) -> Option<DateRange> {
    match DateRange::parse(from, to) {
        Ok(dates) => Some(dates),
        Err(e) => {
            tracing::error!(from = %from, to = %to, error = %e, "Invalid date range");
            eprintln!("❌ Invalid date range: {e}");
            None
        }
    }
}
