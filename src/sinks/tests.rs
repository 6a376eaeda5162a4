use std::time::Duration;

use crate::args::{HttpMethod, PositiveU64};
use crate::config::TestConfig;
use crate::error::{AppError, AppResult, ConfigError};
use crate::metrics::{ErrorKind, RequestOutcome, build_report};

use super::format::summary_lines;
use super::writers::{write_json_report, write_text_report};

fn sample_config() -> AppResult<TestConfig> {
    let url = "http://localhost:8080/api";
    Ok(TestConfig {
        url: url.parse().map_err(|err| {
            AppError::config(ConfigError::InvalidUrl {
                url: url.to_owned(),
                source: err,
            })
        })?,
        method: HttpMethod::Get,
        request_count: PositiveU64::try_from(4)?,
        timeout: Duration::from_secs(30),
        headers: vec![("Accept".to_owned(), "application/json".to_owned())],
        body: None,
        concurrency: None,
    })
}

fn sample_outcomes() -> Vec<RequestOutcome> {
    vec![
        RequestOutcome::from_response(0, Duration::from_millis(100), 200),
        RequestOutcome::from_response(1, Duration::from_millis(200), 200),
        RequestOutcome::from_response(2, Duration::from_millis(50), 500),
        RequestOutcome::from_error(3, Duration::from_millis(900), ErrorKind::Timeout),
    ]
}

#[test]
fn summary_includes_counts_rates_and_histogram() -> AppResult<()> {
    let config = sample_config()?;
    let outcomes = sample_outcomes();
    let report = build_report(&outcomes, Duration::from_secs(1));
    let lines = summary_lines(&config, &report);
    let text = lines.join("\n");

    assert!(text.contains("Target: GET http://localhost:8080/api"));
    assert!(text.contains("Requests: 4 (all launched together)"));
    assert!(text.contains("Successful: 2 (50.0%)"));
    assert!(text.contains("Failed: 2 (timeouts: 1, connection errors: 0, other: 0)"));
    assert!(text.contains("Requests/sec: 4.00"));
    assert!(text.contains("  200: 2"));
    assert!(text.contains("  500: 1"));
    Ok(())
}

#[test]
fn summary_handles_response_free_runs() -> AppResult<()> {
    let config = sample_config()?;
    let outcomes = vec![
        RequestOutcome::from_error(0, Duration::from_secs(1), ErrorKind::Timeout),
        RequestOutcome::from_error(1, Duration::from_secs(1), ErrorKind::Timeout),
    ];
    let report = build_report(&outcomes, Duration::from_secs(1));
    let lines = summary_lines(&config, &report);
    let text = lines.join("\n");

    assert!(text.contains("Status Codes: (no responses received)"));
    assert!(text.contains("Avg Latency (ok): 0.000s"));
    Ok(())
}

#[test]
fn text_report_lists_outcomes_by_index() -> Result<(), String> {
    let config = sample_config().map_err(|err| format!("config failed: {}", err))?;
    let mut outcomes = sample_outcomes();
    outcomes.reverse();
    let report = build_report(&outcomes, Duration::from_secs(1));

    let dir = tempfile::tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = write_text_report(dir.path(), &config, &report, &outcomes)
        .map_err(|err| format!("write failed: {}", err))?;
    let content =
        std::fs::read_to_string(&path).map_err(|err| format!("read failed: {}", err))?;

    assert!(content.contains("apiburst run report"));
    assert!(content.contains("  URL: http://localhost:8080/api"));
    let first = content
        .find("#   0:")
        .ok_or_else(|| "missing outcome 0".to_owned())?;
    let last = content
        .find("#   3:")
        .ok_or_else(|| "missing outcome 3".to_owned())?;
    assert!(first < last);
    assert!(content.contains("timeout"));
    Ok(())
}

#[test]
fn json_report_round_trips() -> Result<(), String> {
    let outcomes = sample_outcomes();
    let report = build_report(&outcomes, Duration::from_secs(1));

    let dir = tempfile::tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("report.json");
    write_json_report(&path, &report).map_err(|err| format!("write failed: {}", err))?;

    let content =
        std::fs::read_to_string(&path).map_err(|err| format!("read failed: {}", err))?;
    let value: serde_json::Value =
        serde_json::from_str(&content).map_err(|err| format!("parse failed: {}", err))?;
    assert_eq!(value["request_count"], 4);
    assert_eq!(value["success_count"], 2);
    assert_eq!(value["timeout_count"], 1);
    Ok(())
}
