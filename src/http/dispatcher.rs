use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::{Client, Request};
use tokio::sync::{Semaphore, mpsc};
use tokio::time::Instant;
use tracing::debug;

use crate::config::TestConfig;
use crate::error::{AppError, AppResult, HttpError};
use crate::metrics::{ErrorKind, RequestOutcome};
use crate::shutdown::ShutdownSender;

/// A completed batch: every attempt's outcome plus the wall-clock span of
/// the whole run.
#[derive(Debug)]
pub struct Batch {
    pub outcomes: Vec<RequestOutcome>,
    pub duration: Duration,
}

/// Fires `request_count` attempts against the configured target and
/// collects exactly one [`RequestOutcome`] per attempt.
///
/// Each attempt runs in its own task and owns its outcome record; outcomes
/// fan in over an mpsc channel, so no attempt reads another attempt's
/// state. When `concurrency` is set, attempts gate on a semaphore before
/// starting their timer; the cap changes pacing only. An individual
/// attempt failing or timing out never aborts the batch.
///
/// # Errors
///
/// Returns an error when a request template cannot be built or cloned,
/// when the shutdown signal fires before every attempt completes (partial
/// outcomes are discarded), or when fewer outcomes than attempts arrive.
pub async fn dispatch(
    client: &Client,
    config: &TestConfig,
    shutdown_tx: &ShutdownSender,
) -> AppResult<Batch> {
    let template = build_request_template(client, config)?;
    let count = config.request_count.get();
    let capacity = usize::try_from(count).unwrap_or(usize::MAX);
    let (outcome_tx, mut outcome_rx) = mpsc::channel::<RequestOutcome>(capacity.max(1));
    let permits = config
        .concurrency
        .map(|cap| Arc::new(Semaphore::new(cap.get())));

    let start = Instant::now();
    let mut handles = Vec::with_capacity(capacity);
    for index in 0..count {
        let request = template
            .try_clone()
            .ok_or(HttpError::CloneRequestFailed { index })
            .map_err(AppError::http)?;
        let client = client.clone();
        let outcome_tx = outcome_tx.clone();
        let permits = permits.clone();
        let mut shutdown_rx = shutdown_tx.subscribe();

        handles.push(tokio::spawn(async move {
            let _permit = match permits {
                Some(semaphore) => match semaphore.acquire_owned().await {
                    Ok(permit) => Some(permit),
                    Err(_) => return,
                },
                None => None,
            };
            let outcome = tokio::select! {
                outcome = execute_attempt(&client, request, index) => outcome,
                _ = shutdown_rx.recv() => return,
            };
            drop(outcome_tx.send(outcome).await);
        }));
    }
    drop(outcome_tx);

    let mut outcomes: Vec<RequestOutcome> = Vec::with_capacity(capacity);
    let mut shutdown_rx = shutdown_tx.subscribe();
    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => {
                for handle in &handles {
                    handle.abort();
                }
                return Err(AppError::Interrupted);
            }
            maybe_outcome = outcome_rx.recv() => match maybe_outcome {
                Some(outcome) => {
                    outcomes.push(outcome);
                    if outcomes.len() == capacity {
                        break;
                    }
                }
                None => break,
            }
        }
    }
    let duration = start.elapsed();

    for handle in handles {
        drop(handle.await);
    }

    let received = u64::try_from(outcomes.len()).unwrap_or(u64::MAX);
    if received != count {
        if shutdown_rx.try_recv().is_ok() {
            return Err(AppError::Interrupted);
        }
        return Err(AppError::http(HttpError::BatchIncomplete {
            expected: count,
            received,
        }));
    }

    Ok(Batch { outcomes, duration })
}

fn build_request_template(client: &Client, config: &TestConfig) -> AppResult<Request> {
    let mut builder = client.request(reqwest::Method::from(config.method), config.url.clone());
    for (key, value) in &config.headers {
        builder = builder.header(key, value);
    }
    if let Some(body) = &config.body {
        builder = builder.body(body.clone());
    }
    builder
        .build()
        .map_err(|err| AppError::http(HttpError::BuildRequestFailed { source: err }))
}

/// Runs one attempt to its terminal state. Latency covers the full
/// exchange and is measured for every outcome, errors and timeouts
/// included.
async fn execute_attempt(client: &Client, request: Request, index: u64) -> RequestOutcome {
    let start = Instant::now();
    match client.execute(request).await {
        Ok(response) => {
            let status = response.status().as_u16();
            match drain_response_body(response).await {
                Ok(bytes) => {
                    debug!("Attempt {}: {} ({} body bytes)", index, status, bytes);
                    RequestOutcome::from_response(index, start.elapsed(), status)
                }
                Err(err) => {
                    let kind = ErrorKind::classify(&err);
                    debug!("Attempt {}: body read failed ({}): {}", index, kind.as_str(), err);
                    RequestOutcome::from_broken_response(index, start.elapsed(), status, kind)
                }
            }
        }
        Err(err) => {
            let kind = ErrorKind::classify(&err);
            debug!("Attempt {}: {} ({})", index, kind.as_str(), err);
            RequestOutcome::from_error(index, start.elapsed(), kind)
        }
    }
}

async fn drain_response_body(response: reqwest::Response) -> Result<u64, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut total_bytes: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let bytes = chunk?;
        total_bytes = total_bytes.saturating_add(u64::try_from(bytes.len()).unwrap_or(u64::MAX));
    }
    Ok(total_bytes)
}
