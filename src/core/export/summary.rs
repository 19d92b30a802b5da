//! Export outcomes and reporting
//!
//! This module defines the results returned by single and bulk exports.

use crate::domain::JobError;
use std::path::PathBuf;
use std::time::Duration;

/// Marker logged and returned when an export completes
pub const SUCCESS_MARKER: &str = "export_rekap_success";

/// Files produced by one job or one single-scope export
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobOutput {
    /// Spreadsheet parts in part order
    pub parts: Vec<PathBuf>,

    /// Data rows written across all parts
    pub rows: usize,
}

/// Result of a single-scope export
#[derive(Debug, Clone)]
pub struct SingleExportOutcome {
    /// Scope label used for the part directory and archive
    pub label: String,

    /// Path of the written archive
    pub archive_path: PathBuf,

    /// Spreadsheet parts bundled into the archive
    pub parts: Vec<PathBuf>,

    /// Data rows exported
    pub rows: usize,

    /// Wall-clock time of the export
    pub duration: Duration,
}

impl SingleExportOutcome {
    /// Log the outcome
    pub fn log_summary(&self) {
        tracing::info!(
            label = %self.label,
            archive = %self.archive_path.display(),
            parts = self.parts.len(),
            rows = self.rows,
            duration_ms = self.duration.as_millis() as u64,
            "{}",
            SUCCESS_MARKER
        );
    }
}

/// Partial-success report of a bulk export
///
/// Job failures never fail the bulk call; they are collected here.
#[derive(Debug, Default)]
pub struct BulkExportReport {
    /// Jobs produced by the job builder
    pub total_jobs: usize,

    /// Jobs that completed
    pub succeeded: usize,

    /// Jobs that failed, tagged with the worker that ran them
    pub failed: Vec<JobError>,

    /// Jobs never started because of a shutdown signal
    pub skipped: usize,

    /// Whether a shutdown signal stopped dispatching early
    pub interrupted: bool,

    /// Data rows exported by successful jobs
    pub rows: usize,

    /// Wall-clock time of the export
    pub duration: Duration,
}

impl BulkExportReport {
    /// Creates an empty report for `total_jobs` jobs
    pub fn new(total_jobs: usize) -> Self {
        Self {
            total_jobs,
            ..Self::default()
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// True when every job completed
    pub fn is_successful(&self) -> bool {
        self.failed.is_empty() && self.skipped == 0 && !self.interrupted
    }

    /// Get success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_jobs == 0 {
            return 100.0;
        }
        (self.succeeded as f64 / self.total_jobs as f64) * 100.0
    }

    /// Log the report
    pub fn log_summary(&self) {
        tracing::info!(
            total_jobs = self.total_jobs,
            succeeded = self.succeeded,
            failed = self.failed.len(),
            skipped = self.skipped,
            interrupted = self.interrupted,
            rows = self.rows,
            duration_secs = self.duration.as_secs(),
            success_rate = format!("{:.2}%", self.success_rate()),
            "Bulk export completed"
        );

        if self.is_successful() {
            tracing::info!("{}", SUCCESS_MARKER);
        }
    }
}
