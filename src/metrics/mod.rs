//! Per-attempt outcome records and their reduction into a run report.
mod aggregate;
mod types;


pub use aggregate::build_report;
pub use types::{ErrorKind, Percentiles, RequestOutcome, TestReport};
