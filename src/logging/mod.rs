//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - JSON-formatted log files
//! - Configurable log levels
//! - Local file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use rekap::logging::init_logging;
//! use rekap::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, rotation_for, LoggingGuard, LOG_FILE_NAME};

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use rekap::log_error_with_context;
/// use rekap::domain::RekapError;
///
/// let error = RekapError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
