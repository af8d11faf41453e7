use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    args::ReplayArgs,
    error::AppResult,
    http::{ReqwestExecutor, RequestExecutor, RequestReplayer, build_client},
    metrics::{ConsoleReport, LocalMinuteClock, MetricsAggregator},
    pool::{RunReport, SessionRunner, WorkerPool},
    trace::ReplayPlan,
};

/// Replays the plan against the real targets, reporting to stdout.
///
/// # Errors
///
/// Returns an error when the HTTP client cannot be built or a worker task
/// cannot be joined.
pub async fn run_local(args: &ReplayArgs, plan: ReplayPlan) -> AppResult<RunReport> {
    info!("Target hosts: {}", plan.hosts.join("; "));
    let client = build_client(args)?;
    let executor: Arc<dyn RequestExecutor> = Arc::new(ReqwestExecutor::new(client));
    let metrics = Arc::new(MetricsAggregator::new(
        LocalMinuteClock,
        Arc::new(ConsoleReport),
    ));
    execute(args, plan, executor, metrics).await
}

/// Runs the worker pool with the given executor and metrics.
///
/// # Errors
///
/// Returns an error when a worker task cannot be joined.
pub async fn execute(
    args: &ReplayArgs,
    plan: ReplayPlan,
    executor: Arc<dyn RequestExecutor>,
    metrics: Arc<MetricsAggregator>,
) -> AppResult<RunReport> {
    let replayer = Arc::new(RequestReplayer::new(
        executor,
        args.max_sockets.get(),
        args.max_random_wait,
        Arc::clone(&metrics),
    ));
    let runner = Arc::new(SessionRunner::new(replayer, plan.requests));
    let workers = u64::try_from(args.virtual_users.get()).unwrap_or(u64::MAX);
    let target = args.target_sessions();
    info!(
        "Starting {} virtual users for {} sessions of {} requests",
        workers,
        target,
        runner.request_count()
    );

    let run = WorkerPool::new(runner, metrics, workers, target).run().await?;
    if run.failed_workers > 0 {
        warn!(
            "{} of {} virtual users stopped after a failed session",
            run.failed_workers, workers
        );
    }
    Ok(run)
}
