//! Run-report formatting and persistence.
mod format;
mod writers;

#[cfg(test)]
mod tests;

pub(crate) use format::summary_lines;
pub(crate) use writers::{print_summary, write_json_report, write_text_report};
