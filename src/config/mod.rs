//! Configuration: file loading, CLI merge, and validated run config.
mod apply;
mod loader;
mod types;


pub(crate) use apply::{apply_config_file, build_test_config};
pub(crate) use loader::has_default_config;
pub use loader::load_config;
pub use types::{ConfigFile, TestConfig};
