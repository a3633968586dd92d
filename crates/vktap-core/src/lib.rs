//! Configuration shared by every `vktap` crate.
//!
//! The tap is driven by a single JSON or YAML file plus a handful of
//! environment overrides. Everything is resolved and validated once at
//! startup into a [`TapConfig`]; nothing downstream reads the environment.

pub mod config;
pub mod error;
mod tap_config;

pub use config::{load_tap_config, parse_tap_config};
pub use error::ConfigError;
pub use tap_config::{
    LegacyParams, TapConfig, DEFAULT_API_BASE_URL, DEFAULT_API_VERSION, DEFAULT_LOOKBACK_DAYS,
    DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
