use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, Url, header::HeaderMap};

use crate::metrics::test_support::{ManualClock, RecordingSink};
use crate::metrics::MetricsAggregator;
use crate::trace::PreparedRequest;

use super::executor::{ExecuteError, ReplayResponse, RequestExecutor};

type Respond = dyn Fn(&PreparedRequest) -> Result<ReplayResponse, ExecuteError> + Send + Sync;

/// Executor answering from a closure, optionally after a delay, while
/// tracking how many calls are in flight.
pub(crate) struct ScriptedExecutor {
    respond: Box<Respond>,
    delay: Duration,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedExecutor {
    pub(crate) fn new<F>(respond: F) -> Self
    where
        F: Fn(&PreparedRequest) -> Result<ReplayResponse, ExecuteError> + Send + Sync + 'static,
    {
        Self {
            respond: Box::new(respond),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub(crate) fn always_ok(body_len: u64) -> Self {
        Self::new(move |_request| Ok(response(200, body_len)))
    }

    pub(crate) const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RequestExecutor for ScriptedExecutor {
    async fn execute(&self, request: &PreparedRequest) -> Result<ReplayResponse, ExecuteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst).saturating_add(1);
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let result = (self.respond)(request);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

pub(crate) fn response(status: u16, body_len: u64) -> ReplayResponse {
    ReplayResponse {
        status,
        headers: HeaderMap::new(),
        body_len,
    }
}

pub(crate) fn get_request(url: &str) -> Result<PreparedRequest, String> {
    Ok(PreparedRequest {
        method: Method::GET,
        url: Url::parse(url).map_err(|err| err.to_string())?,
        headers: HeaderMap::new(),
        body: None,
    })
}

pub(crate) fn requests(count: usize) -> Result<Arc<[PreparedRequest]>, String> {
    (0..count)
        .map(|index| get_request(&format!("http://a.test/resource/{}", index)))
        .collect::<Result<Vec<_>, _>>()
        .map(Into::into)
}

pub(crate) fn recording_metrics() -> (Arc<MetricsAggregator>, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    let clock = ManualClock::new("12:00");
    let metrics = Arc::new(MetricsAggregator::new(move || clock.label(), sink.clone()));
    (metrics, sink)
}
