//! Single-job gate around [`BatchRunner`].
//!
//! At most one batch runs at a time. `start` returns as soon as the worker
//! thread is spawned; clients poll `status`. `stop` is cooperative and is
//! observed before the next slot.

use super::backend::ImageBackend;
use super::output::OutputLayout;
use super::runner::{BatchEnd, BatchRunner, RunMonitor, SlotProgress};
use super::BatchRequest;
use crate::catalog::CategoryCatalog;
use crate::profiles::ProfileAssembler;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum JobError {
    #[error("a generation job is already running")]
    AlreadyRunning,
    #[error("invalid request: {0:#}")]
    InvalidRequest(#[from] anyhow::Error),
    #[error("failed to spawn generation worker")]
    Spawn(#[source] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    #[default]
    Idle,
    Running,
    Completed,
    Stopped,
    Failed,
}

/// Polled view of the current or last job.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobStatus {
    pub state: JobState,
    pub running: bool,
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
    pub current_slot: Option<usize>,
    pub last_error: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub started_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl JobStatus {
    fn starting(total: usize) -> Self {
        let now = Utc::now();
        Self {
            state: JobState::Running,
            running: true,
            total,
            started_at: Some(now),
            updated_at: Some(now),
            ..Self::default()
        }
    }

    pub fn progress_percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.completed + self.failed) as f64 / self.total as f64 * 100.0
    }

    pub fn describe(&self) -> String {
        let mut line = format!(
            "{:?}: {}/{} done ({:.1}%), {} failed",
            self.state,
            self.completed,
            self.total,
            self.progress_percent(),
            self.failed
        );
        if let Some(err) = &self.last_error {
            line.push_str(&format!(", last error: {err}"));
        }
        line
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct JobMonitor {
    stop_requested: Arc<AtomicBool>,
    status: Arc<Mutex<JobStatus>>,
}

impl RunMonitor for JobMonitor {
    fn keep_running(&self) -> bool {
        !self.stop_requested.load(Ordering::SeqCst)
    }

    fn batch_started(&self, output_dir: &Path, total: usize) {
        let mut status = lock(&self.status);
        status.output_dir = Some(output_dir.to_path_buf());
        status.total = total;
        status.updated_at = Some(Utc::now());
    }

    fn slot_finished(&self, progress: &SlotProgress<'_>) {
        let mut status = lock(&self.status);
        status.current_slot = Some(progress.slot);
        status.completed = progress.completed;
        status.failed = progress.failed;
        if let Some(issue) = progress.issue {
            status.last_error = Some(issue.message.clone());
        }
        status.updated_at = Some(Utc::now());
    }
}

/// Reopens the gate when the worker exits, including by panic.
struct WorkerRelease {
    active: Arc<AtomicBool>,
    status: Arc<Mutex<JobStatus>>,
}

impl Drop for WorkerRelease {
    fn drop(&mut self) {
        {
            let mut status = lock(&self.status);
            if status.running {
                error!("generation worker panicked");
                status.state = JobState::Failed;
                status.running = false;
                status.last_error = Some("generation worker panicked".to_string());
                status.updated_at = Some(Utc::now());
            }
        }
        self.active.store(false, Ordering::SeqCst);
    }
}

/// Owns the assembler and runs at most one batch at a time on a worker thread.
pub struct JobController {
    catalog: Arc<CategoryCatalog>,
    assembler: Arc<Mutex<ProfileAssembler>>,
    backend: Arc<dyn ImageBackend>,
    layout: OutputLayout,
    max_batch_size: u32,
    active: Arc<AtomicBool>,
    stop_requested: Arc<AtomicBool>,
    status: Arc<Mutex<JobStatus>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl JobController {
    pub fn new(
        assembler: ProfileAssembler,
        backend: Arc<dyn ImageBackend>,
        layout: OutputLayout,
        max_batch_size: u32,
    ) -> Self {
        Self {
            catalog: assembler.catalog_handle(),
            assembler: Arc::new(Mutex::new(assembler)),
            backend,
            layout,
            max_batch_size,
            active: Arc::new(AtomicBool::new(false)),
            stop_requested: Arc::new(AtomicBool::new(false)),
            status: Arc::new(Mutex::new(JobStatus::default())),
            worker: Mutex::new(None),
        }
    }

    pub fn is_running(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    pub fn status(&self) -> JobStatus {
        lock(&self.status).clone()
    }

    /// Validates and starts `request` in the background.
    pub fn start(&self, request: BatchRequest) -> Result<(), JobError> {
        request.validate(self.max_batch_size, &self.catalog)?;
        if self
            .active
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(JobError::AlreadyRunning);
        }
        self.stop_requested.store(false, Ordering::SeqCst);
        *lock(&self.status) = JobStatus::starting(request.count as usize);

        // Reap the previous worker, which has already released `active`.
        if let Some(previous) = lock(&self.worker).take() {
            let _ = previous.join();
        }

        let assembler = Arc::clone(&self.assembler);
        let backend = Arc::clone(&self.backend);
        let layout = self.layout.clone();
        let active = Arc::clone(&self.active);
        let monitor = JobMonitor {
            stop_requested: Arc::clone(&self.stop_requested),
            status: Arc::clone(&self.status),
        };

        let spawned = thread::Builder::new()
            .name("diversity-job".into())
            .spawn(move || {
                let _release = WorkerRelease {
                    active,
                    status: Arc::clone(&monitor.status),
                };
                let mut rng = StdRng::from_entropy();
                let result = {
                    let mut guard = lock(&assembler);
                    BatchRunner::new(&mut guard, backend.as_ref(), &layout).run(
                        &request,
                        &monitor,
                        &mut rng,
                    )
                };
                let mut status = lock(&monitor.status);
                match result {
                    Ok(outcome) => {
                        info!("{}", outcome.describe());
                        status.state = match outcome.end {
                            BatchEnd::Completed => JobState::Completed,
                            BatchEnd::Stopped => JobState::Stopped,
                        };
                        status.completed = outcome.completed();
                        status.failed = outcome.issues.len();
                        status.output_dir = Some(outcome.output_dir);
                    }
                    Err(err) => {
                        error!(error = %format!("{err:#}"), "generation job failed");
                        status.state = JobState::Failed;
                        status.last_error = Some(format!("{err:#}"));
                    }
                }
                status.running = false;
                status.updated_at = Some(Utc::now());
            });

        match spawned {
            Ok(handle) => {
                *lock(&self.worker) = Some(handle);
                Ok(())
            }
            Err(err) => {
                let mut status = lock(&self.status);
                status.state = JobState::Failed;
                status.running = false;
                status.last_error = Some(err.to_string());
                self.active.store(false, Ordering::SeqCst);
                Err(JobError::Spawn(err))
            }
        }
    }

    /// Asks the running job to stop before its next slot.
    pub fn stop(&self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.stop_requested.store(true, Ordering::SeqCst);
        info!("stop requested for running generation job");
        true
    }

    /// Blocks until the current worker, if any, has finished.
    pub fn wait(&self) -> JobStatus {
        if let Some(handle) = lock(&self.worker).take() {
            let _ = handle.join();
        }
        self.status()
    }

    /// Clears selection history; refused while a job runs.
    pub fn reset_history(&self) -> Result<(), JobError> {
        if self.is_running() {
            return Err(JobError::AlreadyRunning);
        }
        lock(&self.assembler).reset_history();
        Ok(())
    }

    /// Runs `f` against the assembler, waiting for a running job to finish.
    pub fn with_assembler<T>(&self, f: impl FnOnce(&ProfileAssembler) -> T) -> T {
        f(&lock(&self.assembler))
    }
}
