// Rekap - Hierarchical spreadsheet export pipeline
// Copyright (c) 2025 Rekap Contributors
// Licensed under the MIT License

use rekap::cli::{exit_code, Cli, Commands};
use rekap::config::{load_config, LoggingConfig};
use rekap::logging::init_logging;
use clap::Parser;
use std::process;
use std::time::Duration;
use tokio::sync::watch;

#[tokio::main]
async fn main() {
    // .env is optional
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // File logging follows the config when it loads; init and broken configs log to console only
    let loaded = load_config(&cli.config).ok();
    let logging_config = match (&cli.command, &loaded) {
        (Commands::Init(_), _) | (_, None) => LoggingConfig {
            local_enabled: false,
            ..LoggingConfig::default()
        },
        (_, Some(config)) => config.logging.clone(),
    };
    let log_level = cli
        .log_level
        .clone()
        .or_else(|| loaded.as_ref().map(|c| c.application.log_level.clone()))
        .unwrap_or_else(|| "info".to_string());

    let _guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(exit_code::FATAL);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Rekap - Hierarchical spreadsheet export pipeline"
    );

    let shutdown_timeout = Duration::from_secs(
        loaded
            .as_ref()
            .map(|c| c.export.shutdown_timeout_secs)
            .unwrap_or(30),
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        wait_for_signal().await;
        println!("\n⚠️  Shutdown signal received, finishing in-flight work...");
        let _ = shutdown_tx.send(true);

        // A second signal or the timeout ends the process
        tokio::select! {
            _ = wait_for_signal() => {
                tracing::warn!("Second shutdown signal received, exiting immediately");
            }
            _ = tokio::time::sleep(shutdown_timeout) => {
                tracing::warn!(
                    timeout_secs = shutdown_timeout.as_secs(),
                    "Shutdown timeout elapsed, exiting"
                );
            }
        }
        process::exit(exit_code::INTERRUPTED);
    });

    let exit_code = match execute_command(&cli, shutdown_rx).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            exit_code::FATAL
        }
    };

    drop(_guard);
    process::exit(exit_code);
}

async fn wait_for_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {
                        tracing::info!("Received SIGINT (Ctrl+C), initiating graceful shutdown...");
                    }
                    _ = sigterm.recv() => {
                        tracing::info!("Received SIGTERM, initiating graceful shutdown...");
                    }
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to create SIGTERM handler");
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::info!("Received SIGINT (Ctrl+C), initiating graceful shutdown...");
                }
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        tracing::info!("Received SIGINT (Ctrl+C), initiating graceful shutdown...");
    }
}

async fn execute_command(cli: &Cli, shutdown_signal: watch::Receiver<bool>) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Export(args) => args.execute(&cli.config, shutdown_signal).await,
        Commands::ExportAll(args) => args.execute(&cli.config, shutdown_signal).await,
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
        Commands::Init(args) => args.execute().await,
    }
}
