//! Integration tests for graceful shutdown
//!
//! These tests verify that:
//! - Shutdown signals reach every worker
//! - Queued jobs are reported as skipped, never started
//! - In-flight jobs are abandoned and reported as cancelled
//! - Single exports stop before writing when the signal is already set

use async_trait::async_trait;
use rekap::adapters::{HierarchyProvider, RowSource};
use rekap::core::export::{ExportCoordinator, ExportJob, JobOutput, JobRunner, WorkerPool};
use rekap::core::spreadsheet::SpreadsheetSettings;
use rekap::domain::{
    DateRange, ExportFilter, ExportKind, ExportScope, OrgNode, Result, RowSet,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::{watch, Notify};

fn jobs(n: usize) -> Vec<ExportJob> {
    let dates = DateRange::parse("2025/02/01", "2025/02/28").unwrap();
    (0..n)
        .map(|i| ExportJob {
            filename: format!("JOB_{i}"),
            filter: ExportFilter::new(ExportScope::Unit(i.to_string()), dates),
        })
        .collect()
}

/// Blocks every run until the test has sent the shutdown signal
struct BlockingRunner {
    started: AtomicUsize,
    entered: Notify,
}

#[async_trait]
impl JobRunner for BlockingRunner {
    async fn run(&self, _job: &ExportJob) -> Result<JobOutput> {
        self.started.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        // never finishes on its own
        std::future::pending::<()>().await;
        Ok(JobOutput::default())
    }
}

#[tokio::test]
async fn test_shutdown_signal_propagation() {
    let (shutdown_tx, shutdown_rx1) = watch::channel(false);
    let shutdown_rx2 = shutdown_rx1.clone();

    assert!(!*shutdown_rx1.borrow());
    assert!(!*shutdown_rx2.borrow());

    shutdown_tx.send(true).unwrap();

    assert!(*shutdown_rx1.borrow());
    assert!(*shutdown_rx2.borrow());
}

#[tokio::test]
async fn test_in_flight_jobs_cancelled_and_queue_skipped() {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let runner = Arc::new(BlockingRunner {
        started: AtomicUsize::new(0),
        entered: Notify::new(),
    });

    let pool_runner = Arc::clone(&runner) as Arc<dyn JobRunner>;
    let handle = tokio::spawn(async move {
        let mut pool = WorkerPool::new(1);
        pool.run(jobs(5), pool_runner, shutdown_rx).await
    });

    runner.entered.notified().await;
    shutdown_tx.send(true).unwrap();

    let report = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("pool did not stop after shutdown")
        .unwrap();

    assert_eq!(runner.started.load(Ordering::SeqCst), 1);
    assert_eq!(report.succeeded, 0);
    assert_eq!(report.failed.len(), 1);
    assert!(report.failed[0].error.is_cancelled());
    assert_eq!(report.skipped, 4);
    assert!(report.interrupted);
    assert!(!report.is_successful());
}

struct NeverCalledSource;

#[async_trait]
impl RowSource for NeverCalledSource {
    async fn fetch_rows(&self, kind: ExportKind, _filter: &ExportFilter) -> Result<RowSet> {
        panic!("fetch_rows must not run after shutdown ({kind})");
    }
}

struct SingleUnit;

#[async_trait]
impl HierarchyProvider for SingleUnit {
    async fn get_hierarchy(&self) -> Result<OrgNode> {
        Ok(OrgNode::unit("52001", "Kota"))
    }
}

#[tokio::test]
async fn test_single_export_stops_before_fetch() {
    let dir = TempDir::new().unwrap();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    shutdown_tx.send(true).unwrap();

    let coordinator = ExportCoordinator::with_settings(
        SpreadsheetSettings::with_root(dir.path()),
        2,
        Arc::new(NeverCalledSource),
        Arc::new(SingleUnit),
        shutdown_rx,
    );

    let filter = ExportFilter::new(
        ExportScope::Unit("52001".to_string()),
        DateRange::parse("2025/02/01", "2025/02/28").unwrap(),
    );
    let err = coordinator
        .export_single(ExportKind::Transactions, &filter)
        .await
        .unwrap_err();

    assert!(err.is_cancelled());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_bulk_export_after_shutdown_skips_every_job() {
    let dir = TempDir::new().unwrap();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    shutdown_tx.send(true).unwrap();

    let coordinator = ExportCoordinator::with_settings(
        SpreadsheetSettings::with_root(dir.path()),
        2,
        Arc::new(NeverCalledSource),
        Arc::new(SingleUnit),
        shutdown_rx,
    );

    let base = ExportFilter::new(
        ExportScope::National,
        DateRange::parse("2025/02/01", "2025/02/28").unwrap(),
    );
    let report = coordinator
        .export_all(ExportKind::Customers, &base)
        .await
        .unwrap();

    assert_eq!(report.total_jobs, 1);
    assert_eq!(report.skipped, 1);
    assert!(report.interrupted);
}
