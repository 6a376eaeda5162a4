//! HTTP client construction and concurrent request dispatch.
mod client;
mod dispatcher;


pub use client::build_client;
pub use dispatcher::{Batch, dispatch};
