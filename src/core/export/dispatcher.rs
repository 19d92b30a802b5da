//! Worker pool for bulk exports
//!
//! Jobs are pushed into a bounded queue sized to the job count, the queue is
//! closed, and a fixed number of workers drain it. A failing job never stops
//! its siblings; its error is tagged with the worker id and collected on a
//! second channel that is drained once every worker has exited.

use crate::core::export::jobs::ExportJob;
use crate::core::export::summary::{BulkExportReport, JobOutput};
use crate::domain::{JobError, RekapError, Result};
use async_trait::async_trait;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinSet;

/// Executes one export job
#[async_trait]
pub trait JobRunner: Send + Sync {
    async fn run(&self, job: &ExportJob) -> Result<JobOutput>;
}

/// Lifecycle of one dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatcherState {
    /// No dispatch started yet
    Idle,
    /// Jobs queued and workers running
    Dispatching,
    /// Queue closed, waiting for workers to exit
    Draining,
    /// Every worker exited
    Done,
}

impl fmt::Display for DispatcherState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DispatcherState::Idle => "idle",
            DispatcherState::Dispatching => "dispatching",
            DispatcherState::Draining => "draining",
            DispatcherState::Done => "done",
        };
        f.write_str(name)
    }
}

/// Fixed-size pool of export workers
#[derive(Debug)]
pub struct WorkerPool {
    size: usize,
    state: DispatcherState,
    history: Vec<DispatcherState>,
}

#[derive(Default)]
struct Counters {
    succeeded: AtomicUsize,
    rows: AtomicUsize,
}

struct Worker {
    id: usize,
    queue: Arc<Mutex<mpsc::Receiver<ExportJob>>>,
    errors: mpsc::Sender<JobError>,
    runner: Arc<dyn JobRunner>,
    counters: Arc<Counters>,
    shutdown: watch::Receiver<bool>,
}

impl WorkerPool {
    /// Creates a pool with `size` workers; a size of zero is raised to one
    pub fn new(size: usize) -> Self {
        Self {
            size: size.max(1),
            state: DispatcherState::Idle,
            history: Vec::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn state(&self) -> DispatcherState {
        self.state
    }

    /// States entered so far, in order
    pub fn history(&self) -> &[DispatcherState] {
        &self.history
    }

    fn transition(&mut self, next: DispatcherState) {
        tracing::debug!(from = %self.state, to = %next, "Dispatcher state changed");
        self.state = next;
        self.history.push(next);
    }

    /// Runs every job on the pool and waits for all workers to exit
    ///
    /// Job failures are collected in the report. When `shutdown` flips to
    /// `true`, workers stop taking new jobs, in-flight jobs are abandoned and
    /// the jobs left in the queue are counted as skipped.
    pub async fn run(
        &mut self,
        jobs: Vec<ExportJob>,
        runner: Arc<dyn JobRunner>,
        shutdown: watch::Receiver<bool>,
    ) -> BulkExportReport {
        let total = jobs.len();
        let mut report = BulkExportReport::new(total);

        if total == 0 {
            self.transition(DispatcherState::Done);
            return report;
        }

        let (job_tx, job_rx) = mpsc::channel::<ExportJob>(total);
        let queue = Arc::new(Mutex::new(job_rx));
        let (error_tx, mut error_rx) = mpsc::channel::<JobError>(total);
        let counters = Arc::new(Counters::default());

        self.transition(DispatcherState::Dispatching);
        tracing::info!(workers = self.size, jobs = total, "Dispatching export jobs");

        let mut workers = JoinSet::new();
        for id in 1..=self.size {
            let worker = Worker {
                id,
                queue: Arc::clone(&queue),
                errors: error_tx.clone(),
                runner: Arc::clone(&runner),
                counters: Arc::clone(&counters),
                shutdown: shutdown.clone(),
            };
            workers.spawn(worker.run());
        }
        drop(error_tx);

        for job in jobs {
            if let Err(e) = job_tx.try_send(job) {
                // capacity equals the job count, so this only fires on a closed receiver
                tracing::error!(error = %e, "Failed to queue export job");
            }
        }

        self.transition(DispatcherState::Draining);
        drop(job_tx);
        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                tracing::error!(error = %e, "Export worker terminated abnormally");
            }
        }
        self.transition(DispatcherState::Done);

        while let Some(error) = error_rx.recv().await {
            report.failed.push(error);
        }

        let mut queue = queue.lock().await;
        while queue.try_recv().is_ok() {
            report.skipped += 1;
        }

        report.succeeded = counters.succeeded.load(Ordering::SeqCst);
        report.rows = counters.rows.load(Ordering::SeqCst);
        report.interrupted = *shutdown.borrow() || report.skipped > 0;

        if !report.failed.is_empty() {
            tracing::error!(
                error_count = report.failed.len(),
                "Export jobs failed"
            );
            for error in &report.failed {
                tracing::error!(
                    worker_id = error.worker_id,
                    filename = %error.filename,
                    error = %error.error,
                    "Job error"
                );
            }
        }

        if report.interrupted {
            tracing::warn!(skipped = report.skipped, "Dispatch interrupted by shutdown signal");
        }

        report
    }
}

impl Worker {
    async fn run(mut self) {
        loop {
            if *self.shutdown.borrow() {
                tracing::debug!(worker_id = self.id, "Worker stopping on shutdown signal");
                break;
            }

            let next = { self.queue.lock().await.recv().await };
            let Some(job) = next else {
                break;
            };

            tracing::info!(
                worker_id = self.id,
                filename = %job.filename,
                "Worker processing"
            );

            let outcome = tokio::select! {
                result = self.runner.run(&job) => result,
                _ = wait_for_shutdown(&mut self.shutdown) => Err(RekapError::Cancelled(format!(
                    "job {} interrupted by shutdown", job.filename
                ))),
            };

            match outcome {
                Ok(output) => {
                    self.counters.succeeded.fetch_add(1, Ordering::SeqCst);
                    self.counters.rows.fetch_add(output.rows, Ordering::SeqCst);
                    tracing::info!(
                        worker_id = self.id,
                        filename = %job.filename,
                        parts = output.parts.len(),
                        rows = output.rows,
                        "Job finished"
                    );
                }
                Err(error) => {
                    tracing::warn!(
                        worker_id = self.id,
                        filename = %job.filename,
                        error = %error,
                        "Job failed"
                    );
                    let job_error = JobError::new(self.id, job.filename, error);
                    if self.errors.send(job_error).await.is_err() {
                        tracing::error!(worker_id = self.id, "Error channel closed");
                    }
                }
            }
        }
    }
}

/// Resolves once the shutdown flag is set; never resolves if the sender is gone
async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow() {
            return;
        }
        if shutdown.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
