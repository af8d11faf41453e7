//! Virtual users that replay sessions until the session target is reached.
mod session;
mod state;


use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, warn};

use crate::error::AppResult;
use crate::metrics::{FinalReport, MetricsAggregator};

pub use session::SessionRunner;
pub use state::{NextStep, WorkerPoolState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub completed_sessions: u64,
    /// Workers that stopped because a session aborted.
    pub failed_workers: u64,
    pub report: FinalReport,
}

pub struct WorkerPool {
    runner: Arc<SessionRunner>,
    metrics: Arc<MetricsAggregator>,
    workers: u64,
    target: u64,
}

impl WorkerPool {
    #[must_use]
    pub const fn new(
        runner: Arc<SessionRunner>,
        metrics: Arc<MetricsAggregator>,
        workers: u64,
        target: u64,
    ) -> Self {
        Self {
            runner,
            metrics,
            workers,
            target,
        }
    }

    /// Starts every worker, waits until all of them are done, then emits the
    /// final report exactly once.
    ///
    /// # Errors
    ///
    /// Returns an error when a worker task could not be joined.
    pub async fn run(self) -> AppResult<RunReport> {
        let state = Arc::new(Mutex::new(WorkerPoolState::started(
            self.workers,
            self.target,
        )));
        let mut worker_handles = Vec::new();

        for worker_id in 0..self.workers {
            let runner = Arc::clone(&self.runner);
            let metrics = Arc::clone(&self.metrics);
            let state = Arc::clone(&state);
            worker_handles.push(tokio::spawn(async move {
                run_worker(worker_id, &runner, &metrics, &state).await
            }));
        }

        let mut failed_workers: u64 = 0;
        for handle in worker_handles {
            if handle.await? == WorkerExit::Failed {
                failed_workers = failed_workers.saturating_add(1);
            }
        }

        let completed_sessions = lock_state(&state).completed();
        let report = self.metrics.finalize(completed_sessions);
        Ok(RunReport {
            completed_sessions,
            failed_workers,
            report,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WorkerExit {
    Done,
    Failed,
}

async fn run_worker(
    worker_id: u64,
    runner: &SessionRunner,
    metrics: &MetricsAggregator,
    state: &Mutex<WorkerPoolState>,
) -> WorkerExit {
    loop {
        let duration = match runner.run().await {
            Ok(duration) => duration,
            Err(err) => {
                warn!(
                    "Session of worker {} failed: {} ({})",
                    worker_id,
                    err,
                    err.url().unwrap_or("-")
                );
                return WorkerExit::Failed;
            }
        };
        metrics.record_session(duration);

        let next = lock_state(state).complete_session();
        if next == NextStep::Done {
            debug!("Worker {} done", worker_id);
            return WorkerExit::Done;
        }
    }
}

fn lock_state(state: &Mutex<WorkerPoolState>) -> std::sync::MutexGuard<'_, WorkerPoolState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
