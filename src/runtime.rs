//! Bounded worker runtime for report requests.
//!
//! `ReportEngine` is synchronous and does its own per-kind fan-out. Hosts
//! that serve many dashboard requests put it behind this runtime: a fixed
//! set of worker threads fed by a bounded queue. A full queue rejects new
//! work immediately instead of letting latency grow without bound.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::engine::ReportEngine;
use crate::error::{ReportError, ReportResult, RuntimeError};
use crate::filter::ReportRequest;
use crate::report::{Overview, Report};

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportRuntimeConfig {
    /// Number of worker threads.
    pub workers: usize,
    /// Maximum queued requests.
    pub queue_capacity: usize,
}

impl Default for ReportRuntimeConfig {
    fn default() -> Self {
        Self {
            workers: 2,
            queue_capacity: 256,
        }
    }
}

enum Job {
    Report {
        request: ReportRequest,
        reply: Sender<ReportResult<Report>>,
    },
    Overview {
        request: ReportRequest,
        reply: Sender<ReportResult<Overview>>,
    },

    #[cfg(test)]
    Sleep {
        duration: Duration,
        reply: Sender<()>,
    },
}

struct WorkerPool {
    tx: Sender<Job>,
    workers: Vec<JoinHandle<()>>,
    queue_capacity: usize,
}

impl WorkerPool {
    fn start(workers: usize, queue_capacity: usize, engine: &Arc<ReportEngine>) -> ReportResult<Self> {
        let workers = workers.max(1);
        let queue_capacity = queue_capacity.max(1);
        let (tx, rx) = bounded::<Job>(queue_capacity);

        let mut handles = Vec::with_capacity(workers);
        for idx in 0..workers {
            let rx: Receiver<Job> = rx.clone();
            let engine = Arc::clone(engine);
            let handle = thread::Builder::new()
                .name(format!("heritage-report-{idx}"))
                .spawn(move || worker_loop(&rx, &engine))
                .map_err(|e| ReportError::internal(format!("failed to spawn report worker: {e}")))?;
            handles.push(handle);
        }

        Ok(Self {
            tx,
            workers: handles,
            queue_capacity,
        })
    }

    fn try_submit(&self, job: Job) -> Result<(), RuntimeError> {
        match self.tx.try_send(job) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                warn!(capacity = self.queue_capacity, "report queue full");
                Err(RuntimeError::QueueFull {
                    capacity: self.queue_capacity,
                })
            }
            Err(TrySendError::Disconnected(_)) => Err(RuntimeError::Disconnected),
        }
    }

    fn shutdown(self) {
        // Close the channel: workers will drain queued jobs then exit.
        drop(self.tx);
        for handle in self.workers {
            let _ = handle.join();
        }
    }
}

fn worker_loop(rx: &Receiver<Job>, engine: &ReportEngine) {
    while let Ok(job) = rx.recv() {
        match job {
            Job::Report { request, reply } => {
                let _ = reply.send(guarded(|| engine.generate(&request)));
            }
            Job::Overview { request, reply } => {
                let _ = reply.send(guarded(|| engine.overview(&request)));
            }

            #[cfg(test)]
            Job::Sleep { duration, reply } => {
                thread::sleep(duration);
                let _ = reply.send(());
            }
        }
    }
    debug!("report worker exiting");
}

/// Runs one job, turning a panic into an error for its caller so the worker
/// survives to take the next job.
fn guarded<T>(job: impl FnOnce() -> ReportResult<T>) -> ReportResult<T> {
    panic::catch_unwind(AssertUnwindSafe(job)).unwrap_or_else(|_| {
        warn!("report job panicked");
        Err(ReportError::internal("report job panicked"))
    })
}

/// Handle to a submitted request.
pub struct ReportHandle<T> {
    rx: Receiver<ReportResult<T>>,
}

impl<T> ReportHandle<T> {
    /// Waits for the request to complete.
    pub fn join(self) -> ReportResult<T> {
        self.rx
            .recv()
            .map_err(|_| ReportError::Runtime(RuntimeError::Disconnected))?
    }

    /// Waits for the request to complete with a timeout.
    pub fn join_timeout(self, timeout: Duration) -> ReportResult<T> {
        self.rx.recv_timeout(timeout).map_err(|err| match err {
            crossbeam_channel::RecvTimeoutError::Timeout => ReportError::Runtime(RuntimeError::Timeout {
                duration_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            }),
            crossbeam_channel::RecvTimeoutError::Disconnected => {
                ReportError::Runtime(RuntimeError::Disconnected)
            }
        })?
    }
}

/// A report engine behind a bounded worker pool.
pub struct ReportRuntime {
    engine: Arc<ReportEngine>,
    pool: Option<WorkerPool>,
}

impl ReportRuntime {
    /// Starts the worker threads.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Internal` if a worker thread cannot be spawned.
    pub fn new(engine: ReportEngine, config: &ReportRuntimeConfig) -> ReportResult<Self> {
        let engine = Arc::new(engine);
        let pool = WorkerPool::start(config.workers, config.queue_capacity, &engine)?;
        Ok(Self {
            engine,
            pool: Some(pool),
        })
    }

    fn submit_job(&self, job: Job) -> ReportResult<()> {
        let pool = self
            .pool
            .as_ref()
            .ok_or(ReportError::Runtime(RuntimeError::Disconnected))?;
        pool.try_submit(job)?;
        Ok(())
    }

    /// Queues a full report request.
    ///
    /// # Errors
    ///
    /// Returns `RuntimeError::QueueFull` if the queue is at capacity.
    pub fn submit(&self, request: ReportRequest) -> ReportResult<ReportHandle<Report>> {
        let (reply, rx) = bounded(1);
        self.submit_job(Job::Report { request, reply })?;
        Ok(ReportHandle { rx })
    }

    /// Queues an overview-only request.
    pub fn submit_overview(&self, request: ReportRequest) -> ReportResult<ReportHandle<Overview>> {
        let (reply, rx) = bounded(1);
        self.submit_job(Job::Overview { request, reply })?;
        Ok(ReportHandle { rx })
    }

    /// Generates a report on the pool and waits for it.
    pub fn generate(&self, request: ReportRequest) -> ReportResult<Report> {
        self.submit(request)?.join()
    }

    /// Computes an overview on the pool and waits for it.
    pub fn overview(&self, request: ReportRequest) -> ReportResult<Overview> {
        self.submit_overview(request)?.join()
    }

    /// Returns a shared reference to the underlying engine.
    #[must_use]
    pub fn engine(&self) -> &ReportEngine {
        &self.engine
    }

    #[cfg(test)]
    fn submit_sleep(&self, duration: Duration) -> ReportResult<Receiver<()>> {
        let (reply, rx) = bounded(1);
        self.submit_job(Job::Sleep { duration, reply })?;
        Ok(rx)
    }
}

impl Drop for ReportRuntime {
    fn drop(&mut self) {
        if let Some(pool) = self.pool.take() {
            pool.shutdown();
        }
    }
}
