use std::sync::{Arc, Mutex, PoisonError};

use super::report::{ReportSink, final_lines, minute_line};
use super::types::{BucketSummary, FinalReport};

/// Clock whose label is set by the test.
#[derive(Clone)]
pub(crate) struct ManualClock {
    label: Arc<Mutex<String>>,
}

impl ManualClock {
    pub(crate) fn new(label: &str) -> Self {
        Self {
            label: Arc::new(Mutex::new(label.to_owned())),
        }
    }

    pub(crate) fn set(&self, label: &str) {
        let mut current = self.label.lock().unwrap_or_else(PoisonError::into_inner);
        *current = label.to_owned();
    }

    pub(crate) fn label(&self) -> String {
        self.label
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Sink that keeps every emitted summary and the printed lines.
#[derive(Default)]
pub(crate) struct RecordingSink {
    minutes: Mutex<Vec<BucketSummary>>,
    finals: Mutex<Vec<FinalReport>>,
    lines: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub(crate) fn minutes(&self) -> Vec<BucketSummary> {
        self.minutes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn finals(&self) -> Vec<FinalReport> {
        self.finals
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ReportSink for RecordingSink {
    fn minute_summary(&self, summary: &BucketSummary) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(minute_line(summary));
        self.minutes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(summary.clone());
    }

    fn final_report(&self, report: &FinalReport) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(final_lines(report));
        self.finals
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(report.clone());
    }
}
