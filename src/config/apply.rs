use clap::ArgMatches;
use clap::parser::ValueSource;
use tracing::warn;

use crate::args::{BurstArgs, PositiveU64, PositiveUsize, parse_header};
use crate::error::{AppError, AppResult, ConfigError, ValidationError};

use super::types::{ConfigFile, TestConfig};

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}

fn ensure_positive_u64(value: u64, field: &str) -> AppResult<PositiveU64> {
    PositiveU64::try_from(value).map_err(|err| {
        AppError::config(ConfigError::FieldMustBePositive {
            field: field.to_owned(),
            source: err,
        })
    })
}

fn ensure_positive_usize(value: usize, field: &str) -> AppResult<PositiveUsize> {
    PositiveUsize::try_from(value).map_err(|err| {
        AppError::config(ConfigError::FieldMustBePositive {
            field: field.to_owned(),
            source: err,
        })
    })
}

fn parse_headers(headers: &[String]) -> AppResult<Vec<(String, String)>> {
    let mut parsed = Vec::with_capacity(headers.len());
    for header in headers {
        parsed.push(
            parse_header(header)
                .map_err(|err| AppError::config(ConfigError::InvalidHeader { source: err }))?,
        );
    }
    Ok(parsed)
}

/// Fills in argument values from the config file. CLI-provided values win.
pub(crate) fn apply_config_file(
    args: &mut BurstArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if !is_cli(matches, "url")
        && let Some(url) = config.url.clone()
    {
        args.url = Some(url);
    }

    if !is_cli(matches, "method")
        && let Some(method) = config.method
    {
        args.method = method;
    }

    if !is_cli(matches, "requests")
        && let Some(requests) = config.requests
    {
        args.requests = ensure_positive_u64(requests, "requests")?;
    }

    if !is_cli(matches, "timeout")
        && let Some(timeout) = config.timeout.as_ref()
    {
        args.timeout = timeout.resolve()?;
    }

    if !is_cli(matches, "headers")
        && let Some(headers) = config.headers.as_ref()
    {
        args.headers = parse_headers(headers)?;
    }

    if !is_cli(matches, "data")
        && let Some(data) = config.data.clone()
    {
        args.data = Some(data);
    }

    if !is_cli(matches, "concurrency")
        && let Some(concurrency) = config.concurrency
    {
        args.concurrency = Some(ensure_positive_usize(concurrency, "concurrency")?);
    }

    if !is_cli(matches, "output_dir")
        && let Some(output_dir) = config.output_dir.clone()
    {
        args.output_dir = output_dir;
    }

    if !is_cli(matches, "no_save")
        && let Some(no_save) = config.no_save
    {
        args.no_save = no_save;
    }

    if !is_cli(matches, "export_json")
        && let Some(export_json) = config.export_json.clone()
    {
        args.export_json = Some(export_json);
    }

    Ok(())
}

/// Builds the validated run config. Fails fast before any network call.
pub(crate) fn build_test_config(args: &BurstArgs) -> AppResult<TestConfig> {
    let raw_url = args
        .url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .ok_or_else(|| AppError::validation(ValidationError::MissingUrl))?;

    let url = raw_url.parse::<reqwest::Url>().map_err(|err| {
        AppError::config(ConfigError::InvalidUrl {
            url: raw_url.to_owned(),
            source: err,
        })
    })?;

    let body = match args.data.clone() {
        Some(data) if args.method.carries_body() => Some(data),
        Some(_) => {
            warn!(
                "Ignoring request body: {} does not carry one.",
                args.method.as_str()
            );
            None
        }
        None => None,
    };

    Ok(TestConfig {
        url,
        method: args.method,
        request_count: args.requests,
        timeout: args.timeout,
        headers: args.headers.clone(),
        body,
        concurrency: args.concurrency,
    })
}
