use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::sync::Semaphore;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::metrics::{MetricsAggregator, Sample};
use crate::trace::PreparedRequest;

use super::executor::{ExecuteError, ReplayResponse, RequestExecutor, response_size};

/// Statuses counted as a successful page resource load.
pub const SUCCESS_STATUSES: [u16; 2] = [200, 304];

const NOT_MODIFIED: u16 = 304;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayOutcome {
    /// `bytes` is `None` when the client surfaced the status as an error and
    /// headers and body were not available to size the response.
    Success { status: u16, bytes: Option<u64> },
    Unexpected { status: u16 },
    Failed { timed_out: bool },
}

impl ReplayOutcome {
    #[must_use]
    pub const fn sample(self) -> Sample {
        match self {
            ReplayOutcome::Success { bytes, .. } => Sample::Success { bytes },
            ReplayOutcome::Unexpected { .. } => Sample::UnexpectedStatus,
            ReplayOutcome::Failed { .. } => Sample::Error,
        }
    }
}

/// Maps what the executor returned onto the replay outcome classes.
#[must_use]
pub fn classify(result: Result<ReplayResponse, ExecuteError>) -> ReplayOutcome {
    match result {
        Ok(response) if SUCCESS_STATUSES.contains(&response.status) => ReplayOutcome::Success {
            status: response.status,
            bytes: Some(response_size(&response.headers, response.body_len)),
        },
        Ok(response) => ReplayOutcome::Unexpected {
            status: response.status,
        },
        Err(ExecuteError::Status {
            status: NOT_MODIFIED,
        }) => ReplayOutcome::Success {
            status: NOT_MODIFIED,
            bytes: None,
        },
        Err(ExecuteError::Timeout) => ReplayOutcome::Failed { timed_out: true },
        Err(ExecuteError::Status { .. } | ExecuteError::Transport { .. }) => {
            ReplayOutcome::Failed { timed_out: false }
        }
    }
}

/// Reissues single recorded requests and feeds every outcome to the metrics.
///
/// The socket semaphore is shared by all virtual users, so it bounds the
/// requests in flight for the whole process.
pub struct RequestReplayer {
    executor: Arc<dyn RequestExecutor>,
    sockets: Arc<Semaphore>,
    metrics: Arc<MetricsAggregator>,
    max_random_wait: Duration,
}

impl RequestReplayer {
    #[must_use]
    pub fn new(
        executor: Arc<dyn RequestExecutor>,
        max_sockets: usize,
        max_random_wait: Duration,
        metrics: Arc<MetricsAggregator>,
    ) -> Self {
        Self {
            executor,
            sockets: Arc::new(Semaphore::new(max_sockets.min(Semaphore::MAX_PERMITS))),
            metrics,
            max_random_wait,
        }
    }

    /// Replays one request after a random pause. Never fails: every result,
    /// including transport errors, is converted into an outcome and recorded.
    pub async fn replay(&self, request: &PreparedRequest) -> ReplayOutcome {
        random_pause(self.max_random_wait).await;

        let result = match self.sockets.acquire().await {
            Ok(_permit) => self.executor.execute(request).await,
            Err(err) => Err(ExecuteError::Transport {
                message: err.to_string(),
            }),
        };
        if let Err(err) = result.as_ref() {
            debug!("{} {}: {}", request.method, request.url, err);
        }

        let outcome = classify(result);
        if let ReplayOutcome::Unexpected { status } = outcome {
            warn!("{} {}", status, request.url);
        }
        self.metrics.record(outcome.sample());
        outcome
    }
}

async fn random_pause(max_wait: Duration) {
    let max_ms = u64::try_from(max_wait.as_millis()).unwrap_or(u64::MAX);
    if max_ms == 0 {
        return;
    }
    let delay_ms = rand::thread_rng().gen_range(0..max_ms);
    sleep(Duration::from_millis(delay_ms)).await;
}
