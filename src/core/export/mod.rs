//! Export orchestration
//!
//! This module provides the export pipeline for Rekap:
//! - Batch planning over large row sets
//! - Job building from the organizational hierarchy
//! - The worker pool that runs bulk jobs
//! - Coordination of single and bulk exports
//! - Outcomes and reporting

pub mod batch;
pub mod coordinator;
pub mod dispatcher;
pub mod jobs;
pub mod summary;

pub use batch::{plan_batches, Batch};
pub use coordinator::{ExportCoordinator, ExportJobRunner};
pub use dispatcher::{DispatcherState, JobRunner, WorkerPool};
pub use jobs::{build_jobs, ExportJob};
pub use summary::{BulkExportReport, JobOutput, SingleExportOutcome, SUCCESS_MARKER};
