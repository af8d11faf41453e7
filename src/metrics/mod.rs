//! Minute-bucketed aggregation of replay outcomes and session durations.
mod aggregator;
mod report;
mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use aggregator::{BucketClock, LocalMinuteClock, MetricsAggregator};
pub use report::{ConsoleReport, ReportSink, final_lines, format_seconds, minute_line};
pub use types::{BucketSummary, FinalReport, Sample, TimeBucket};
