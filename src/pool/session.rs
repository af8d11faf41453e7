use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use tokio::task::JoinSet;
use tokio::time::Instant;

use crate::error::SessionError;
use crate::http::RequestReplayer;
use crate::trace::PreparedRequest;

/// One virtual-user visit: every in-scope request, all at once.
pub struct SessionRunner {
    replayer: Arc<RequestReplayer>,
    requests: Arc<[PreparedRequest]>,
}

impl SessionRunner {
    #[must_use]
    pub const fn new(replayer: Arc<RequestReplayer>, requests: Arc<[PreparedRequest]>) -> Self {
        Self { replayer, requests }
    }

    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests.len()
    }

    /// Replays every request concurrently and waits for all of them.
    ///
    /// Failed requests are already accounted for by the replayer and do not
    /// fail the session. Only a replay that aborts without an outcome does;
    /// the other replays still run to completion before that error is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::ReplayAborted` for the first replay that
    /// panicked, or `SessionError::Join` when a replay task was cancelled.
    pub async fn run(&self) -> Result<Duration, SessionError> {
        let started = Instant::now();
        let mut replays = JoinSet::new();
        for index in 0..self.requests.len() {
            let replayer = Arc::clone(&self.replayer);
            let requests = Arc::clone(&self.requests);
            replays.spawn(async move {
                let Some(request) = requests.get(index) else {
                    return Ok(());
                };
                AssertUnwindSafe(replayer.replay(request))
                    .catch_unwind()
                    .await
                    .map(drop)
                    .map_err(|_panic| SessionError::ReplayAborted {
                        url: request.url.to_string(),
                    })
            });
        }

        let mut first_error = None;
        while let Some(joined) = replays.join_next().await {
            let result = joined.map_err(|source| SessionError::Join { source });
            if let Err(err) = result.and_then(|replayed| replayed) {
                first_error.get_or_insert(err);
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(started.elapsed()),
        }
    }
}
