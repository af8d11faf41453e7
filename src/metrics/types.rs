use std::time::Duration;

/// Rates are normalized to a fixed one-minute window.
pub(crate) const WINDOW_SECS: u64 = 60;
pub(crate) const BYTES_PER_KB: u64 = 1024;
const MS_PER_CENTISECOND: u64 = 10;
const CENTIS_PER_SEC: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sample {
    /// A 200/304 response; `bytes` is absent when the response could not be sized.
    Success { bytes: Option<u64> },
    /// Network failure, timeout, or a status reported as a client error.
    Error,
    /// Any other status. Reported, but not an error.
    UnexpectedStatus,
}

/// Observations of one wall-clock minute, keyed by its `HH:MM` label.
#[derive(Debug, Clone, Default)]
pub struct TimeBucket {
    pub label: String,
    pub requests: Vec<Option<u64>>,
    pub errors: u64,
    pub unexpected: u64,
    pub sessions: Vec<Duration>,
}

impl TimeBucket {
    #[must_use]
    pub fn new(label: String) -> Self {
        Self {
            label,
            ..Self::default()
        }
    }

    pub fn push(&mut self, sample: Sample) {
        match sample {
            Sample::Success { bytes } => self.requests.push(bytes),
            Sample::Error => self.errors = self.errors.saturating_add(1),
            Sample::UnexpectedStatus => self.unexpected = self.unexpected.saturating_add(1),
        }
    }

    pub fn push_session(&mut self, duration: Duration) {
        self.sessions.push(duration);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
            && self.errors == 0
            && self.unexpected == 0
            && self.sessions.is_empty()
    }

    #[must_use]
    pub fn summary(&self) -> BucketSummary {
        BucketSummary {
            label: self.label.clone(),
            requests: len_u64(self.requests.len()),
            errors: self.errors,
            unexpected: self.unexpected,
            bytes: self
                .requests
                .iter()
                .flatten()
                .fold(0u64, |total, bytes| total.saturating_add(*bytes)),
            pages: len_u64(self.sessions.len()),
            session_time: self
                .sessions
                .iter()
                .fold(Duration::ZERO, |total, duration| total.saturating_add(*duration)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketSummary {
    pub label: String,
    pub requests: u64,
    pub errors: u64,
    pub unexpected: u64,
    pub bytes: u64,
    pub pages: u64,
    pub session_time: Duration,
}

impl BucketSummary {
    #[must_use]
    pub fn requests_per_sec(&self) -> u64 {
        round_div(self.requests, WINDOW_SECS)
    }

    #[must_use]
    pub fn kilobytes(&self) -> u64 {
        round_div(self.bytes, BYTES_PER_KB)
    }

    #[must_use]
    pub fn kilobytes_per_sec(&self) -> u64 {
        round_div(self.bytes, BYTES_PER_KB.saturating_mul(WINDOW_SECS))
    }

    /// Average session (page load) duration in milliseconds.
    #[must_use]
    pub fn avg_session_ms(&self) -> Option<u64> {
        let total_ms = u64::try_from(self.session_time.as_millis()).unwrap_or(u64::MAX);
        if self.pages == 0 {
            return None;
        }
        Some(round_div(total_ms, self.pages))
    }

    pub(crate) fn absorb(&mut self, other: &BucketSummary) {
        self.requests = self.requests.saturating_add(other.requests);
        self.errors = self.errors.saturating_add(other.errors);
        self.unexpected = self.unexpected.saturating_add(other.unexpected);
        self.bytes = self.bytes.saturating_add(other.bytes);
        self.pages = self.pages.saturating_add(other.pages);
        self.session_time = self.session_time.saturating_add(other.session_time);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalReport {
    pub totals: BucketSummary,
    pub completed_sessions: u64,
}

/// Integer division rounding half up; `0` for a zero divisor.
pub(crate) fn round_div(value: u64, divisor: u64) -> u64 {
    let Some(quotient) = value.checked_div(divisor) else {
        return 0;
    };
    let remainder = value.checked_rem(divisor).unwrap_or(0);
    if remainder.saturating_mul(2) >= divisor {
        quotient.saturating_add(1)
    } else {
        quotient
    }
}

/// Splits milliseconds into whole seconds and hundredths, rounded.
pub(crate) fn split_seconds(ms: u64) -> (u64, u64) {
    let centis = round_div(ms, MS_PER_CENTISECOND);
    (
        centis.checked_div(CENTIS_PER_SEC).unwrap_or(0),
        centis.checked_rem(CENTIS_PER_SEC).unwrap_or(0),
    )
}

fn len_u64(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}
