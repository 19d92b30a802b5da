//! Export coordinator - entry point for single-scope and bulk exports
//!
//! The single path runs fetch, spreadsheet generation and archiving in
//! sequence. The bulk path walks the hierarchy into jobs and hands them to
//! the worker pool; each job writes its parts without archiving.

use crate::adapters::postgresql::{PostgresClient, PostgresHierarchyProvider, PostgresRowSource};
use crate::adapters::traits::{HierarchyProvider, RowSource};
use crate::config::RekapConfig;
use crate::core::archive::{ArchiveRequest, Archiver};
use crate::core::export::dispatcher::{JobRunner, WorkerPool};
use crate::core::export::jobs::{build_jobs, ExportJob};
use crate::core::export::summary::{BulkExportReport, JobOutput, SingleExportOutcome};
use crate::core::spreadsheet::{SpreadsheetGenerator, SpreadsheetSettings};
use crate::domain::naming::ARCHIVE_EXTENSION;
use crate::domain::{ExportFilter, ExportKind, RekapError, Result, RowSet};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Export coordinator
pub struct ExportCoordinator {
    settings: SpreadsheetSettings,
    worker_count: usize,
    source: Arc<dyn RowSource>,
    hierarchy: Arc<dyn HierarchyProvider>,
    shutdown: watch::Receiver<bool>,
}

impl ExportCoordinator {
    /// Create a coordinator over the given collaborators
    pub fn new(
        config: &RekapConfig,
        source: Arc<dyn RowSource>,
        hierarchy: Arc<dyn HierarchyProvider>,
        shutdown: watch::Receiver<bool>,
    ) -> Result<Self> {
        let settings = SpreadsheetSettings::from_config(config)?;
        Ok(Self::with_settings(
            settings,
            config.export.worker_count,
            source,
            hierarchy,
            shutdown,
        ))
    }

    /// Create a coordinator backed by the configured PostgreSQL databases
    pub fn from_config(config: &RekapConfig, shutdown: watch::Receiver<bool>) -> Result<Self> {
        let primary = Arc::new(PostgresClient::new(&config.postgresql.primary)?);
        let secondary = config
            .postgresql
            .secondary
            .as_ref()
            .map(PostgresClient::new)
            .transpose()?
            .map(Arc::new);

        tracing::debug!(
            primary = %primary.connection_string_safe(),
            secondary_configured = secondary.is_some(),
            "PostgreSQL pools created"
        );

        let source = Arc::new(PostgresRowSource::new(
            Arc::clone(&primary),
            secondary,
            config.source.clone(),
        ));
        let hierarchy = Arc::new(PostgresHierarchyProvider::new(primary, config.source.clone()));

        Self::new(config, source, hierarchy, shutdown)
    }

    pub fn with_settings(
        settings: SpreadsheetSettings,
        worker_count: usize,
        source: Arc<dyn RowSource>,
        hierarchy: Arc<dyn HierarchyProvider>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            settings,
            worker_count,
            source,
            hierarchy,
            shutdown,
        }
    }

    pub fn settings(&self) -> &SpreadsheetSettings {
        &self.settings
    }

    /// Checks connectivity of every configured source
    pub async fn test_connection(&self) -> Result<()> {
        self.source.test_connection().await
    }

    /// Exports one scope into spreadsheet parts and bundles them into
    /// `<output_root>/<label>.tar.gz`
    ///
    /// The first error stops the export. Parts already written stay on disk.
    pub async fn export_single(
        &self,
        kind: ExportKind,
        filter: &ExportFilter,
    ) -> Result<SingleExportOutcome> {
        let start_time = Instant::now();
        let label = filter.label();

        tracing::info!(kind = %kind, label = %label, "Starting export");

        self.ensure_running(&label)?;
        let rows = self.source.fetch_rows(kind, filter).await?;
        let row_count = rows.len();

        self.ensure_running(&label)?;
        let generator = SpreadsheetGenerator::new(self.settings.clone());
        let parts = generate_blocking(generator, rows, label.clone()).await?;

        self.ensure_running(&label)?;
        let archiver = Archiver::new(self.settings.output_root.clone());
        let request = ArchiveRequest::new(parts.clone(), format!("{label}.{ARCHIVE_EXTENSION}"));
        let archive_path = tokio::task::spawn_blocking(move || archiver.archive(&request))
            .await
            .map_err(|e| RekapError::Other(format!("Archive task failed: {e}")))??;

        let outcome = SingleExportOutcome {
            label,
            archive_path,
            parts,
            rows: row_count,
            duration: start_time.elapsed(),
        };
        outcome.log_summary();

        Ok(outcome)
    }

    /// Exports every node of the hierarchy on the worker pool
    ///
    /// Job failures are collected in the report; only a hierarchy failure
    /// fails the call.
    pub async fn export_all(
        &self,
        kind: ExportKind,
        base: &ExportFilter,
    ) -> Result<BulkExportReport> {
        let start_time = Instant::now();

        let root = self.hierarchy.get_hierarchy().await?;
        let jobs = build_jobs(&root, base);

        tracing::info!(
            kind = %kind,
            jobs = jobs.len(),
            workers = self.worker_count,
            "Starting bulk export"
        );

        let runner = Arc::new(ExportJobRunner::new(
            kind,
            Arc::clone(&self.source),
            SpreadsheetGenerator::new(self.settings.clone()),
        ));

        let mut pool = WorkerPool::new(self.worker_count);
        let report = pool
            .run(jobs, runner, self.shutdown.clone())
            .await
            .with_duration(start_time.elapsed());
        report.log_summary();

        Ok(report)
    }

    fn ensure_running(&self, label: &str) -> Result<()> {
        if *self.shutdown.borrow() {
            tracing::warn!(label = %label, "Export stopped by shutdown signal");
            return Err(RekapError::Cancelled(format!("export {label} interrupted by shutdown")));
        }
        Ok(())
    }
}

/// Fetches and writes one job's rows; parts are named after the job filename
pub struct ExportJobRunner {
    kind: ExportKind,
    source: Arc<dyn RowSource>,
    generator: SpreadsheetGenerator,
}

impl ExportJobRunner {
    pub fn new(
        kind: ExportKind,
        source: Arc<dyn RowSource>,
        generator: SpreadsheetGenerator,
    ) -> Self {
        Self {
            kind,
            source,
            generator,
        }
    }
}

#[async_trait]
impl JobRunner for ExportJobRunner {
    async fn run(&self, job: &ExportJob) -> Result<JobOutput> {
        let rows = self.source.fetch_rows(self.kind, &job.filter).await?;
        let row_count = rows.len();

        let parts = generate_blocking(self.generator.clone(), rows, job.filename.clone()).await?;

        Ok(JobOutput {
            parts,
            rows: row_count,
        })
    }
}

async fn generate_blocking(
    generator: SpreadsheetGenerator,
    rows: RowSet,
    label: String,
) -> Result<Vec<PathBuf>> {
    tokio::task::spawn_blocking(move || generator.generate(&rows, &label))
        .await
        .map_err(|e| RekapError::Other(format!("Spreadsheet task failed: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DateRange, ExportScope, OrgNode, TransactionRow};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    struct FixedSource {
        rows: usize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RowSource for FixedSource {
        async fn fetch_rows(&self, kind: ExportKind, _filter: &ExportFilter) -> Result<RowSet> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(kind, ExportKind::Transactions);
            Ok(RowSet::Transactions(
                (0..self.rows)
                    .map(|i| TransactionRow {
                        name: format!("Pelanggan {i}"),
                        ..TransactionRow::default()
                    })
                    .collect(),
            ))
        }
    }

    struct SmallTree;

    #[async_trait]
    impl HierarchyProvider for SmallTree {
        async fn get_hierarchy(&self) -> Result<OrgNode> {
            Ok(OrgNode::region("51", "Jawa Barat").with_child(
                OrgNode::area("52000", "Bandung").with_child(OrgNode::unit("52001", "Kota")),
            ))
        }
    }

    fn coordinator(
        dir: &TempDir,
        rows: usize,
        shutdown: watch::Receiver<bool>,
    ) -> ExportCoordinator {
        ExportCoordinator::with_settings(
            SpreadsheetSettings::with_root(dir.path()).with_batch_size(2),
            2,
            Arc::new(FixedSource {
                rows,
                calls: AtomicUsize::new(0),
            }),
            Arc::new(SmallTree),
            shutdown,
        )
    }

    fn filter() -> ExportFilter {
        ExportFilter::new(
            ExportScope::Unit("52001".into()),
            DateRange::parse("2025/01/01", "2025/01/31").unwrap(),
        )
    }

    #[tokio::test]
    async fn test_export_single_archives_parts() {
        let dir = TempDir::new().unwrap();
        let (_tx, rx) = watch::channel(false);

        let outcome = coordinator(&dir, 3, rx)
            .export_single(ExportKind::Transactions, &filter())
            .await
            .unwrap();

        assert_eq!(outcome.label, "UNIT_52001_20250101_20250131");
        assert_eq!(outcome.parts.len(), 2);
        assert_eq!(outcome.rows, 3);
        assert_eq!(
            outcome.archive_path,
            dir.path().join("UNIT_52001_20250101_20250131.tar.gz")
        );
        assert!(outcome.archive_path.exists());
    }

    #[tokio::test]
    async fn test_export_single_respects_shutdown() {
        let dir = TempDir::new().unwrap();
        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();

        let err = coordinator(&dir, 3, rx)
            .export_single(ExportKind::Transactions, &filter())
            .await
            .unwrap_err();

        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn test_export_all_runs_one_job_per_node() {
        let dir = TempDir::new().unwrap();
        let (_tx, rx) = watch::channel(false);

        let report = coordinator(&dir, 1, rx)
            .export_all(ExportKind::Transactions, &filter())
            .await
            .unwrap();

        assert_eq!(report.total_jobs, 3);
        assert_eq!(report.succeeded, 3);
        assert_eq!(report.rows, 3);
        assert!(dir.path().join("51_JAWA_BARAT").is_dir());
        assert!(!dir.path().join("51_JAWA_BARAT.tar.gz").exists());
    }
}
