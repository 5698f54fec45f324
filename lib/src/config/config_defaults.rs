// lib/src/config/config_defaults.rs

use std::path::PathBuf;

pub const DEFAULT_WINDOW_SECONDS: u64 = 60;
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_CONFIG_FILE: &str = "rolling_degree.yaml";
/// Upper bound on the window; one year is far beyond any useful setting.
pub const MAX_WINDOW_SECONDS: u64 = 365 * 24 * 60 * 60;
pub const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

pub fn default_window_seconds() -> u64 {
    DEFAULT_WINDOW_SECONDS
}

pub fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FILE)
}
