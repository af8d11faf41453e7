use std::path::Path;

use tracing::{error, info};

use crate::app::run_local;
use crate::args::ReplayArgs;
use crate::error::{AppError, AppResult};
use crate::trace::{ReplayPlan, load_trace};

/// Loads the trace and filters it down to the requests to replay.
pub(crate) fn build_plan(args: &ReplayArgs) -> AppResult<ReplayPlan> {
    let path = Path::new(&args.trace);
    let plan = load_trace(path).and_then(|trace| ReplayPlan::from_trace(&trace));
    match plan {
        Ok(plan) => {
            info!(
                "Loaded {} requests in scope from {}",
                plan.requests.len(),
                path.display()
            );
            Ok(plan)
        }
        Err(err) => {
            error!("{}", err);
            Err(AppError::trace(err))
        }
    }
}

pub(crate) async fn execute_plan(args: &ReplayArgs, plan: ReplayPlan) -> AppResult<()> {
    let run = run_local(args, plan).await?;
    info!(
        "Run finished: {} sessions completed, {} workers failed",
        run.completed_sessions, run.failed_workers
    );
    Ok(())
}
