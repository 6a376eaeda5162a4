use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;

use crate::args::{HttpMethod, PositiveU64, PositiveUsize, parse_duration_arg};
use crate::error::{AppError, AppResult, ConfigError};

/// Raw config-file shape. Every field is optional; CLI values win on merge.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub url: Option<String>,
    pub method: Option<HttpMethod>,
    pub requests: Option<u64>,
    pub timeout: Option<DurationValue>,
    pub headers: Option<Vec<String>>,
    pub data: Option<String>,
    pub concurrency: Option<usize>,
    pub output_dir: Option<String>,
    pub no_save: Option<bool>,
    pub export_json: Option<String>,
}

/// A duration given either as bare seconds (`timeout = 30`) or as a
/// suffixed string (`timeout = "500ms"`).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Secs(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn resolve(&self) -> AppResult<Duration> {
        match self {
            DurationValue::Secs(secs) => {
                if *secs == 0 {
                    return Err(AppError::config(ConfigError::InvalidTimeout {
                        source: crate::error::ValidationError::DurationZero,
                    }));
                }
                Ok(Duration::from_secs(*secs))
            }
            DurationValue::Text(text) => parse_duration_arg(text),
        }
    }
}

/// Validated, immutable configuration for one run. The dispatcher never
/// mutates it.
#[derive(Debug, Clone)]
pub struct TestConfig {
    pub url: Url,
    pub method: HttpMethod,
    pub request_count: PositiveU64,
    pub timeout: Duration,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub concurrency: Option<PositiveUsize>,
}
