use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;

/// Why an attempt produced no usable response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Timeout,
    ConnectionError,
    Other,
}

impl ErrorKind {
    /// Maps a reqwest error to the aggregate error taxonomy.
    #[must_use]
    pub fn classify(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            ErrorKind::Timeout
        } else if err.is_connect() {
            ErrorKind::ConnectionError
        } else {
            ErrorKind::Other
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Timeout => "timeout",
            ErrorKind::ConnectionError => "connection error",
            ErrorKind::Other => "other",
        }
    }
}

/// The immutable record of one attempt. Created exactly once, at the
/// attempt's terminal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOutcome {
    /// Attempt ordinal, not completion order.
    pub index: u64,
    /// Response arrived within the timeout with a 2xx status.
    pub succeeded: bool,
    /// Present whenever a response arrived, 2xx or not.
    pub status_code: Option<u16>,
    /// Wall-clock time to the terminal state, measured for every outcome.
    pub latency: Duration,
    /// Present iff no usable response was received.
    pub error: Option<ErrorKind>,
}

impl RequestOutcome {
    /// Outcome for an attempt that received a full response.
    #[must_use]
    pub fn from_response(index: u64, latency: Duration, status: u16) -> Self {
        Self {
            index,
            succeeded: (200..300).contains(&status),
            status_code: Some(status),
            latency,
            error: None,
        }
    }

    /// Outcome for an attempt that never received a response.
    #[must_use]
    pub fn from_error(index: u64, latency: Duration, kind: ErrorKind) -> Self {
        Self {
            index,
            succeeded: false,
            status_code: None,
            latency,
            error: Some(kind),
        }
    }

    /// Outcome for an attempt whose response arrived but whose body could
    /// not be drained. The status code is kept for the histogram.
    #[must_use]
    pub fn from_broken_response(
        index: u64,
        latency: Duration,
        status: u16,
        kind: ErrorKind,
    ) -> Self {
        Self {
            index,
            succeeded: false,
            status_code: Some(status),
            latency,
            error: Some(kind),
        }
    }
}

/// Nearest-rank latency percentiles over successful attempts, in seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Percentiles {
    pub p50: f64,
    pub p95: f64,
    pub p99: f64,
}

/// Aggregate report for one run. Pure function of the outcome set and the
/// measured batch duration.
#[derive(Debug, Clone, Serialize)]
pub struct TestReport {
    pub total_duration_secs: f64,
    pub request_count: u64,
    pub success_count: u64,
    pub failure_count: u64,
    pub timeout_count: u64,
    pub connection_error_count: u64,
    pub other_error_count: u64,
    /// Mean latency over successful attempts; 0.0 when none succeeded.
    pub average_latency_secs: f64,
    /// All 0.0 when no attempt succeeded.
    pub percentiles: Percentiles,
    /// 0.0 when the measured duration is zero.
    pub requests_per_second: f64,
    /// Counts over every outcome carrying a status code, 2xx or not.
    pub status_codes: BTreeMap<u16, u64>,
}
