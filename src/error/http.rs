use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Failed to build HTTP client: {source}")]
    BuildClientFailed {
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to build request: {source}")]
    BuildRequestFailed {
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to clone request template for attempt {index}.")]
    CloneRequestFailed { index: u64 },
    #[error("Batch incomplete: expected {expected} outcomes, received {received}.")]
    BatchIncomplete { expected: u64, received: u64 },
}
