//! Domain error types
//!
//! This module defines the error hierarchy for Rekap.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Rekap error type
///
/// This is the primary error type used throughout the application.
#[derive(Debug, Error)]
pub enum RekapError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Row source or hierarchy provider failed
    #[error("Source fetch error: {0}")]
    SourceFetch(String),

    /// Spreadsheet streaming, flush or save failed
    #[error("Write error: {0}")]
    Write(String),

    /// Archive target failed the path safety checks
    #[error("Archive validation error: {0}")]
    ArchiveValidation(String),

    /// Compression or tar write failure
    #[error("Archive I/O error: {0}")]
    ArchiveIo(String),

    /// Database connection or pool errors
    #[error("Database error: {0}")]
    Database(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Work stopped by a shutdown signal
    #[error("Cancelled: {0}")]
    Cancelled(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl RekapError {
    /// Whether this error came from a shutdown request rather than a failure
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RekapError::Cancelled(_))
    }
}

/// Failure of one bulk export job, tagged with the worker that ran it
#[derive(Debug, Error)]
#[error("worker {worker_id}: {filename}: {error}")]
pub struct JobError {
    /// 1-based identity of the worker that ran the job
    pub worker_id: usize,

    /// Normalized filename of the failed job
    pub filename: String,

    /// Underlying error
    #[source]
    pub error: RekapError,
}

impl JobError {
    /// Creates a new job error
    pub fn new(worker_id: usize, filename: impl Into<String>, error: RekapError) -> Self {
        Self {
            worker_id,
            filename: filename.into(),
            error,
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for RekapError {
    fn from(err: std::io::Error) -> Self {
        RekapError::Io(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for RekapError {
    fn from(err: toml::de::Error) -> Self {
        RekapError::Configuration(format!("TOML parse error: {err}"))
    }
}

// Spreadsheet engine errors are always write failures
impl From<rust_xlsxwriter::XlsxError> for RekapError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        RekapError::Write(err.to_string())
    }
}
