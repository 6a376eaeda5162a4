//! CLI argument surface and shared argument types.
mod cli;
mod parsers;
mod types;


pub use cli::BurstArgs;
pub(crate) use parsers::{parse_duration_arg, parse_header};
pub use types::{HttpMethod, PositiveU64, PositiveUsize};
