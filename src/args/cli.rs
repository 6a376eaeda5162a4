use std::time::Duration;

use clap::Parser;

use super::parsers::{parse_duration_arg, parse_header, parse_positive_u64, parse_positive_usize};
use super::types::{HttpMethod, PositiveU64, PositiveUsize};

/// Default directory for persisted run reports.
pub(crate) const DEFAULT_OUTPUT_DIR: &str = "burst-results";

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Burst-style async HTTP load tester - fires N concurrent requests at an endpoint and reports latency percentiles, success rate, throughput, and status-code breakdown."
)]
pub struct BurstArgs {
    /// Target URL for the burst
    #[arg(long, short)]
    pub url: Option<String>,

    /// HTTP method to use
    #[arg(long, short = 'X', default_value = "get", ignore_case = true)]
    pub method: HttpMethod,

    /// Number of requests to fire
    #[arg(
        long = "requests",
        short = 'n',
        default_value = "10",
        value_parser = parse_positive_u64
    )]
    pub requests: PositiveU64,

    /// Per-request timeout (supports ms/s/m/h; bare numbers are seconds)
    #[arg(
        long = "timeout",
        default_value = "30s",
        value_parser = parse_duration_arg
    )]
    pub timeout: Duration,

    /// HTTP headers in 'Key: Value' format (repeatable)
    #[arg(long = "header", short = 'H', value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Request body (sent for POST/PUT/PATCH/DELETE)
    #[arg(long, short = 'd')]
    pub data: Option<String>,

    /// Cap on simultaneously in-flight requests (default: all at once)
    #[arg(long, short = 'c', value_parser = parse_positive_usize)]
    pub concurrency: Option<PositiveUsize>,

    /// Path to a TOML or JSON config file
    #[arg(long)]
    pub config: Option<String>,

    /// Directory for persisted run reports
    #[arg(long = "output-dir", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: String,

    /// Do not write the per-run report file
    #[arg(long = "no-save")]
    pub no_save: bool,

    /// Write the final report as JSON to this path
    #[arg(long = "export-json")]
    pub export_json: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    pub verbose: bool,
}
