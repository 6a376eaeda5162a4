use std::path::{Path, PathBuf};

use chrono::Local;

use crate::config::TestConfig;
use crate::metrics::{RequestOutcome, TestReport};

use super::format::{format_secs, summary_lines};
use crate::error::AppResult;

pub(crate) fn print_summary(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

/// Writes the timestamped per-run report file and returns its path.
///
/// # Errors
///
/// Returns an error when the output directory cannot be created or the
/// file cannot be written.
pub(crate) fn write_text_report(
    dir: &Path,
    config: &TestConfig,
    report: &TestReport,
    outcomes: &[RequestOutcome],
) -> AppResult<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("burst_{}.txt", timestamp));

    let mut content = String::new();
    push_line(&mut content, "apiburst run report");
    push_line(&mut content, "===================");
    push_line(&mut content, "");
    push_line(&mut content, "Configuration:");
    push_line(&mut content, &format!("  URL: {}", config.url));
    push_line(&mut content, &format!("  Method: {}", config.method.as_str()));
    push_line(
        &mut content,
        &format!("  Requests: {}", config.request_count.get()),
    );
    push_line(
        &mut content,
        &format!("  Timeout: {:.3}s", config.timeout.as_secs_f64()),
    );
    if config.headers.is_empty() {
        push_line(&mut content, "  Headers: (none)");
    } else {
        push_line(&mut content, "  Headers:");
        for (key, value) in &config.headers {
            push_line(&mut content, &format!("    {}: {}", key, value));
        }
    }
    match config.body.as_ref() {
        Some(body) => push_line(&mut content, &format!("  Body: {} bytes", body.len())),
        None => push_line(&mut content, "  Body: (none)"),
    }
    push_line(&mut content, "");

    for line in summary_lines(config, report) {
        push_line(&mut content, &line);
    }
    push_line(&mut content, "");

    push_line(&mut content, "Outcomes:");
    let mut ordered: Vec<&RequestOutcome> = outcomes.iter().collect();
    ordered.sort_by_key(|outcome| outcome.index);
    for outcome in ordered {
        let status = outcome
            .status_code
            .map_or_else(|| "-".to_owned(), |status| status.to_string());
        let detail = match outcome.error {
            Some(kind) => kind.as_str(),
            None if outcome.succeeded => "ok",
            None => "http error",
        };
        push_line(
            &mut content,
            &format!(
                "  #{:>4}: status={:<3} latency={} {}",
                outcome.index,
                status,
                format_secs(outcome.latency.as_secs_f64()),
                detail
            ),
        );
    }

    std::fs::write(&path, content)?;
    Ok(path)
}

/// Writes the report serialized as pretty JSON.
///
/// # Errors
///
/// Returns an error when serialization or the write fails.
pub(crate) fn write_json_report(path: &Path, report: &TestReport) -> AppResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)?;
    Ok(())
}

fn push_line(buffer: &mut String, line: &str) {
    buffer.push_str(line);
    buffer.push('\n');
}
