//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use crate::cli::exit_code;
use clap::Args;
use std::fs;
use std::path::Path;

/// Environment variable referenced by the generated primary connection string
pub const PRIMARY_URL_VAR: &str = "REKAP_PG_PRIMARY_URL";

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "rekap.toml")]
    pub output: String,

    /// Include every option with comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Rekap configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(exit_code::CONFIGURATION);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Set {PRIMARY_URL_VAR} in the environment or a .env file");
                println!("  3. Validate configuration: rekap validate-config --check-connection");
                println!("  4. Run export: rekap export --kind transactions --unit <code> --from <date> --to <date>");
                println!();
                Ok(exit_code::SUCCESS)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(exit_code::FATAL)
            }
        }
    }

    /// Generate minimal configuration
    pub fn generate_minimal_config() -> String {
        r#"# Rekap Configuration File

[application]
log_level = "info"

[export]
output_dir = "files"
batch_size = 150000
worker_count = 10

[postgresql.primary]
connection_string = "${REKAP_PG_PRIMARY_URL}"

[logging]
local_enabled = true
local_path = "/var/log/rekap"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    pub fn generate_config_with_examples() -> String {
        r#"# Rekap Configuration File
#
# Values of the form ${VAR} are read from the environment (or .env).
# Any value can also be overridden with REKAP_<SECTION>_<KEY>, for example
# REKAP_EXPORT_WORKER_COUNT=4.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Export Settings
# ============================================================================
[export]
# Root directory for spreadsheet parts and archives
output_dir = "files"

# Rows per spreadsheet part (at most 1048575)
batch_size = 150000

# Concurrent jobs during export-all
worker_count = 10

# Seconds to wait for in-flight jobs after a shutdown signal
shutdown_timeout_secs = 30

# ============================================================================
# Spreadsheet Styling
# ============================================================================
[spreadsheet]
header_font_size = 12
header_font_color = "000000"
header_fill_color = "E8F2A1"
header_border_color = "000000"
header_row_height = 30
# 1-based column range receiving a fixed width
width_first_column = 2
width_last_column = 15
transaction_column_width = 25
customer_column_width = 26

# ============================================================================
# Databases
# ============================================================================
[postgresql.primary]
connection_string = "${REKAP_PG_PRIMARY_URL}"
max_connections = 10
connection_timeout_seconds = 30
statement_timeout_seconds = 600
# disable | prefer | require
ssl_mode = "prefer"

# Optional second database, used by --secondary and for customer records
# [postgresql.secondary]
# connection_string = "${REKAP_PG_SECONDARY_URL}"
# max_connections = 10
# ssl_mode = "prefer"

# ============================================================================
# Source Relations
# ============================================================================
[source]
transaction_relation = "plnmobile.vw_transaksi"
secondary_transaction_relation = "public.transaksi"
customer_relation = "public.pelanggan"
customers_from_secondary = true
region_relation = "public.pln_regional"
sub_region_relation = "public.pln_unit_upi"
area_relation = "public.pln_unit_ap"
unit_relation = "public.pln_unit_up"

# ============================================================================
# Logging
# ============================================================================
[logging]
local_enabled = true
local_path = "/var/log/rekap"
# daily | hourly | size
local_rotation = "daily"
local_max_size_mb = 100
"#
        .to_string()
    }
}
