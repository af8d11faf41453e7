use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::report::ReportSink;
use super::types::{BucketSummary, FinalReport, Sample, TimeBucket};

/// Source of the current bucket label.
pub trait BucketClock: Send + Sync {
    fn current_label(&self) -> String;
}

/// Local wall clock at minute granularity (`HH:MM`).
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalMinuteClock;

impl BucketClock for LocalMinuteClock {
    fn current_label(&self) -> String {
        chrono::Local::now().format("%H:%M").to_string()
    }
}

impl<F> BucketClock for F
where
    F: Fn() -> String + Send + Sync,
{
    fn current_label(&self) -> String {
        self()
    }
}

struct AggregatorState {
    current: TimeBucket,
    closed: Vec<TimeBucket>,
}

/// Process-wide metrics shared by every replayer.
///
/// Each call reads the clock and compares the label with the open bucket
/// under the same lock. A changed label closes the open bucket, emits its
/// summary, and opens a fresh one before the new observation is added, so a
/// sample always lands in exactly one bucket. Minutes without traffic never
/// get a bucket.
pub struct MetricsAggregator {
    state: Mutex<AggregatorState>,
    clock: Box<dyn BucketClock>,
    sink: Arc<dyn ReportSink>,
}

impl MetricsAggregator {
    pub fn new<C>(clock: C, sink: Arc<dyn ReportSink>) -> Self
    where
        C: BucketClock + 'static,
    {
        let current = TimeBucket::new(clock.current_label());
        Self {
            state: Mutex::new(AggregatorState {
                current,
                closed: Vec::new(),
            }),
            clock: Box::new(clock),
            sink,
        }
    }

    pub fn record(&self, sample: Sample) {
        let mut state = self.lock_current();
        state.current.push(sample);
    }

    pub fn record_session(&self, duration: Duration) {
        let mut state = self.lock_current();
        state.current.push_session(duration);
    }

    /// Emits the open bucket and the run totals, then returns the totals.
    pub fn finalize(&self, completed_sessions: u64) -> FinalReport {
        let state = self.lock_state();
        if !state.current.is_empty() {
            self.sink.minute_summary(&state.current.summary());
        }

        let mut totals = BucketSummary {
            label: "total".to_owned(),
            ..BucketSummary::default()
        };
        for bucket in state.closed.iter().chain(std::iter::once(&state.current)) {
            totals.absorb(&bucket.summary());
        }
        drop(state);

        let report = FinalReport {
            totals,
            completed_sessions,
        };
        self.sink.final_report(&report);
        report
    }

    /// Summaries of every bucket so far, oldest first, the open one last.
    #[must_use]
    pub fn buckets(&self) -> Vec<BucketSummary> {
        let state = self.lock_state();
        state
            .closed
            .iter()
            .chain(std::iter::once(&state.current))
            .map(TimeBucket::summary)
            .collect()
    }

    fn lock_current(&self) -> MutexGuard<'_, AggregatorState> {
        let mut state = self.lock_state();
        let label = self.clock.current_label();
        if state.current.label != label {
            let closing = std::mem::replace(&mut state.current, TimeBucket::new(label));
            if !closing.is_empty() {
                self.sink.minute_summary(&closing.summary());
            }
            state.closed.push(closing);
        }
        state
    }

    fn lock_state(&self) -> MutexGuard<'_, AggregatorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
