//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Rekap configuration file and, optionally, database connectivity.

use crate::cli::exit_code;
use crate::config::load_config;
use crate::config::redact_connection_string;
use crate::core::export::ExportCoordinator;
use clap::Args;
use secrecy::ExposeSecret;
use tokio::sync::watch;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Also open a connection to every configured database
    #[arg(long)]
    pub check_connection: bool,
}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates after substitution and overrides
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration is valid");
                c
            }
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(exit_code::CONFIGURATION);
            }
        };

        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Output Directory: {}", config.export.output_dir);
        println!("  Batch Size: {}", config.export.batch_size);
        println!("  Workers: {}", config.export.worker_count);
        println!(
            "  Primary Database: {}",
            redact_connection_string(
                config
                    .postgresql
                    .primary
                    .connection_string
                    .expose_secret()
                    .as_ref()
            )
        );
        match &config.postgresql.secondary {
            Some(secondary) => println!(
                "  Secondary Database: {}",
                redact_connection_string(secondary.connection_string.expose_secret().as_ref())
            ),
            None => println!("  Secondary Database: (not configured)"),
        }
        println!("  Transactions: {}", config.source.transaction_relation);
        println!("  Customers: {}", config.source.customer_relation);
        println!();

        if !self.check_connection {
            return Ok(exit_code::SUCCESS);
        }

        println!("🔌 Checking database connections...");
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let result = match ExportCoordinator::from_config(&config, shutdown_rx) {
            Ok(coordinator) => coordinator.test_connection().await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                println!("✅ Database connections OK");
                Ok(exit_code::SUCCESS)
            }
            Err(e) => {
                tracing::error!(error = %e, "Connection check failed");
                println!("❌ Connection check failed");
                println!("   Error: {e}");
                Ok(exit_code::CONNECTION)
            }
        }
    }
}
