use reqwest::Client;

use crate::config::TestConfig;
use crate::error::{AppError, AppResult, HttpError};

/// Builds the HTTP client for one run. The per-request timeout covers the
/// whole exchange, body included.
pub fn build_client(config: &TestConfig) -> AppResult<Client> {
    Client::builder()
        .timeout(config.timeout)
        .build()
        .map_err(|err| AppError::http(HttpError::BuildClientFailed { source: err }))
}
