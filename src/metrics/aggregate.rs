use std::collections::BTreeMap;
use std::time::Duration;

use super::types::{ErrorKind, Percentiles, RequestOutcome, TestReport};

/// Percentile ranks reported in the summary.
const PERCENTILE_P50: u64 = 50;
const PERCENTILE_P95: u64 = 95;
const PERCENTILE_P99: u64 = 99;

/// Reduces a completed batch into a [`TestReport`].
///
/// Order-independent over `outcomes`. Latency statistics cover successful
/// attempts only and are reported as explicit `0.0` when nothing succeeded;
/// the status-code histogram covers every outcome that carries a status
/// code, successful or not.
#[must_use]
pub fn build_report(outcomes: &[RequestOutcome], total_duration: Duration) -> TestReport {
    let request_count = u64::try_from(outcomes.len()).unwrap_or(u64::MAX);

    let mut success_count = 0u64;
    let mut timeout_count = 0u64;
    let mut connection_error_count = 0u64;
    let mut other_error_count = 0u64;
    let mut status_codes: BTreeMap<u16, u64> = BTreeMap::new();
    let mut success_latencies: Vec<Duration> = Vec::new();

    for outcome in outcomes {
        if outcome.succeeded {
            success_count = success_count.saturating_add(1);
            success_latencies.push(outcome.latency);
        }
        if let Some(status) = outcome.status_code {
            *status_codes.entry(status).or_insert(0) += 1;
        }
        match outcome.error {
            Some(ErrorKind::Timeout) => timeout_count = timeout_count.saturating_add(1),
            Some(ErrorKind::ConnectionError) => {
                connection_error_count = connection_error_count.saturating_add(1);
            }
            Some(ErrorKind::Other) => other_error_count = other_error_count.saturating_add(1),
            None => {}
        }
    }

    success_latencies.sort_unstable();

    let average_latency_secs = if success_latencies.is_empty() {
        0.0
    } else {
        let sum: f64 = success_latencies.iter().map(Duration::as_secs_f64).sum();
        sum / success_latencies.len() as f64
    };

    let percentiles = Percentiles {
        p50: nearest_rank(&success_latencies, PERCENTILE_P50),
        p95: nearest_rank(&success_latencies, PERCENTILE_P95),
        p99: nearest_rank(&success_latencies, PERCENTILE_P99),
    };

    let duration_secs = total_duration.as_secs_f64();
    let requests_per_second = if duration_secs > 0.0 {
        request_count as f64 / duration_secs
    } else {
        0.0
    };

    TestReport {
        total_duration_secs: duration_secs,
        request_count,
        success_count,
        failure_count: request_count.saturating_sub(success_count),
        timeout_count,
        connection_error_count,
        other_error_count,
        average_latency_secs,
        percentiles,
        requests_per_second,
        status_codes,
    }
}

/// Nearest-rank percentile: value at rank `ceil(p/100 * n)` (1-indexed) of
/// the ascending-sorted input. No interpolation. Empty input yields 0.0.
fn nearest_rank(sorted: &[Duration], percentile: u64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let n = u64::try_from(sorted.len()).unwrap_or(u64::MAX);
    let rank = percentile
        .saturating_mul(n)
        .saturating_add(99)
        .checked_div(100)
        .unwrap_or(1)
        .clamp(1, n);
    let idx = usize::try_from(rank.saturating_sub(1)).unwrap_or(sorted.len().saturating_sub(1));
    sorted
        .get(idx)
        .map_or(0.0, |latency| latency.as_secs_f64())
}
