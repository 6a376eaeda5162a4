use crate::config::TestConfig;
use crate::metrics::TestReport;

pub(crate) fn format_secs(value: f64) -> String {
    format!("{:.3}s", value)
}

fn success_rate_percent(report: &TestReport) -> f64 {
    if report.request_count == 0 {
        return 0.0;
    }
    report.success_count as f64 * 100.0 / report.request_count as f64
}

/// Builds the plain-text summary printed after a run.
pub(crate) fn summary_lines(config: &TestConfig, report: &TestReport) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push(format!("Target: {} {}", config.method.as_str(), config.url));
    match config.concurrency {
        Some(cap) => lines.push(format!(
            "Requests: {} (concurrency cap: {})",
            report.request_count,
            cap.get()
        )),
        None => lines.push(format!(
            "Requests: {} (all launched together)",
            report.request_count
        )),
    }
    lines.push(format!(
        "Total Duration: {}",
        format_secs(report.total_duration_secs)
    ));
    lines.push(format!(
        "Successful: {} ({:.1}%)",
        report.success_count,
        success_rate_percent(report)
    ));
    lines.push(format!(
        "Failed: {} (timeouts: {}, connection errors: {}, other: {})",
        report.failure_count,
        report.timeout_count,
        report.connection_error_count,
        report.other_error_count
    ));
    lines.push(format!(
        "Avg Latency (ok): {}",
        format_secs(report.average_latency_secs)
    ));
    lines.push(format!(
        "P50/P95/P99 Latency (ok): {} / {} / {}",
        format_secs(report.percentiles.p50),
        format_secs(report.percentiles.p95),
        format_secs(report.percentiles.p99)
    ));
    lines.push(format!(
        "Requests/sec: {:.2}",
        report.requests_per_second
    ));

    if report.status_codes.is_empty() {
        lines.push("Status Codes: (no responses received)".to_owned());
    } else {
        lines.push("Status Codes:".to_owned());
        for (status, count) in &report.status_codes {
            lines.push(format!("  {}: {}", status, count));
        }
    }

    lines
}
