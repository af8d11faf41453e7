use super::types::{BucketSummary, FinalReport, split_seconds};

/// Receives the per-minute and final summaries.
pub trait ReportSink: Send + Sync {
    fn minute_summary(&self, summary: &BucketSummary);
    fn final_report(&self, report: &FinalReport);
}

/// Prints summaries to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReport;

impl ReportSink for ConsoleReport {
    fn minute_summary(&self, summary: &BucketSummary) {
        println!("{}", minute_line(summary));
    }

    fn final_report(&self, report: &FinalReport) {
        for line in final_lines(report) {
            println!("{}", line);
        }
    }
}

#[must_use]
pub fn minute_line(summary: &BucketSummary) -> String {
    format!(
        "{} requests: {} errors: {} unexpected: {} req/s: {} KB: {} KB/s: {} avg page load: {} pages: {}",
        summary.label,
        summary.requests,
        summary.errors,
        summary.unexpected,
        summary.requests_per_sec(),
        summary.kilobytes(),
        summary.kilobytes_per_sec(),
        format_seconds(summary.avg_session_ms()),
        summary.pages
    )
}

#[must_use]
pub fn final_lines(report: &FinalReport) -> Vec<String> {
    let totals = &report.totals;
    vec![
        format!(
            "Final requests: {} errors: {} unexpected: {} KB: {} KB/s: {}",
            totals.requests,
            totals.errors,
            totals.unexpected,
            totals.kilobytes(),
            totals.kilobytes_per_sec()
        ),
        format!(
            "Average page load: {} pages: {}",
            format_seconds(totals.avg_session_ms()),
            totals.pages
        ),
        format!("Sessions completed: {}", report.completed_sessions),
    ]
}

/// Formats milliseconds as seconds with two decimals (`-` when absent).
#[must_use]
pub fn format_seconds(ms: Option<u64>) -> String {
    match ms {
        Some(ms) => {
            let (secs, hundredths) = split_seconds(ms);
            format!("{}.{:02}s", secs, hundredths)
        }
        None => "-".to_owned(),
    }
}
